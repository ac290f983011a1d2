//! Record Store Tests
//!
//! Covers the version clock rules (increment on change, authoritative set,
//! never-decreasing) and the query helpers used by the catalog surface.

#[cfg(test)]
mod tests {
    use crate::store::books::{Book, BookPatch, BookStore};

    fn sample_book(id: u32) -> Book {
        Book {
            id,
            title: format!("Title {}", id),
            topic: "Testing".to_string(),
            quantity: 10,
            price: 12.5,
            sequence_number: 0,
        }
    }

    #[test]
    fn test_seed_data_has_seven_books_at_sequence_zero() {
        let store = BookStore::with_seed_data();
        assert_eq!(store.len(), 7);
        for id in 1..=7 {
            let book = store.get(id).expect("seed book should exist");
            assert_eq!(book.id, id);
            assert_eq!(book.sequence_number, 0);
        }
    }

    #[test]
    fn test_update_increments_sequence_on_change() {
        let store = BookStore::new();
        store.insert(sample_book(1));

        let patch = BookPatch {
            quantity: Some(9),
            ..Default::default()
        };
        let committed = store.update(1, &patch).unwrap();

        assert_eq!(committed.quantity, 9);
        assert_eq!(committed.sequence_number, 1);
    }

    #[test]
    fn test_empty_patch_does_not_advance_sequence() {
        let store = BookStore::new();
        store.insert(sample_book(1));

        let committed = store.update(1, &BookPatch::default()).unwrap();

        assert_eq!(committed.sequence_number, 0);
        assert_eq!(committed.quantity, 10);
    }

    #[test]
    fn test_none_fields_are_preserved() {
        let store = BookStore::new();
        store.insert(sample_book(1));

        let patch = BookPatch {
            price: Some(20.0),
            ..Default::default()
        };
        let committed = store.update(1, &patch).unwrap();

        assert_eq!(committed.price, 20.0);
        assert_eq!(committed.title, "Title 1");
        assert_eq!(committed.quantity, 10);
        assert_eq!(committed.sequence_number, 1);
    }

    #[test]
    fn test_negative_price_is_ignored() {
        let store = BookStore::new();
        store.insert(sample_book(1));

        let patch = BookPatch {
            price: Some(-3.0),
            ..Default::default()
        };
        let committed = store.update(1, &patch).unwrap();

        assert_eq!(committed.price, 12.5);
        // The patch still counts as a mutation attempt on a tracked field.
        assert_eq!(committed.sequence_number, 1);
    }

    #[test]
    fn test_explicit_sequence_number_is_set_not_incremented() {
        let store = BookStore::new();
        store.insert(sample_book(1));

        let patch = BookPatch {
            quantity: Some(4),
            sequence_number: Some(7),
            ..Default::default()
        };
        let committed = store.update(1, &patch).unwrap();

        assert_eq!(committed.quantity, 4);
        assert_eq!(committed.sequence_number, 7);
    }

    #[test]
    fn test_sequence_number_never_decreases() {
        let store = BookStore::new();
        let mut book = sample_book(1);
        book.sequence_number = 5;
        store.insert(book);

        let stale = BookPatch {
            quantity: Some(1),
            sequence_number: Some(2),
            ..Default::default()
        };
        let committed = store.update(1, &stale).unwrap();

        // The stale adopt is dropped entirely, fields included.
        assert_eq!(committed.sequence_number, 5);
        assert_eq!(committed.quantity, 10);
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let store = BookStore::new();
        let patch = BookPatch {
            quantity: Some(1),
            ..Default::default()
        };
        assert!(store.update(99, &patch).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let store = BookStore::with_seed_data();

        let matches = store.search("distributed");
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|b| b.topic == "Distributed Systems"));

        let matches = store.search("GRADUATE");
        assert_eq!(matches.len(), 2);

        assert!(store.search("knitting").is_empty());
    }

    #[test]
    fn test_dump_is_ordered_by_id() {
        let store = BookStore::new();
        store.insert(sample_book(3));
        store.insert(sample_book(1));
        store.insert(sample_book(2));

        let ids: Vec<u32> = store.dump().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
