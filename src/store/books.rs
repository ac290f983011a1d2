use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A single catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub topic: String,
    pub quantity: u32,
    pub price: f64,
    /// Version clock. Never decreases for a given id.
    pub sequence_number: u64,
}

/// A partial update. `None` fields keep their stored value.
///
/// When `sequence_number` is `None` the store increments the version clock
/// by one, provided at least one field actually changed. When it is `Some`,
/// the clock is set to that exact value (the replication adopt path).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
}

impl BookPatch {
    /// True when the patch mutates at least one user-visible field.
    pub fn touches_fields(&self) -> bool {
        self.title.is_some()
            || self.topic.is_some()
            || self.quantity.is_some()
            || self.price.is_some()
    }
}

/// Concurrent in-memory store of book records.
pub struct BookStore {
    books: DashMap<u32, Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// The classic seven Bazar books, ids 1..=7, all at sequence number 0.
    pub fn with_seed_data() -> Self {
        let store = Self::new();
        let seed = [
            (
                "How to get a good grade in DOS in 20 minutes a day",
                "Distributed Systems",
                10,
                25.00,
            ),
            ("RPCs for Dummies", "Distributed Systems", 5, 50.00),
            (
                "Xen and the Art of Surviving Graduate School",
                "Graduate School",
                10,
                15.00,
            ),
            (
                "Cooking for the Impatient Graduate Student",
                "Graduate School",
                25,
                10.00,
            ),
            ("How to finish Project 3 on time", "University Problems", 25, 10.00),
            ("Why theory classes are so hard", "University Problems", 25, 10.00),
            ("Spring in the Pioneer Valley", "Developer Life", 25, 10.00),
        ];
        for (index, (title, topic, quantity, price)) in seed.into_iter().enumerate() {
            store.insert(Book {
                id: index as u32 + 1,
                title: title.to_string(),
                topic: topic.to_string(),
                quantity,
                price,
                sequence_number: 0,
            });
        }
        store
    }

    pub fn insert(&self, book: Book) {
        self.books.insert(book.id, book);
    }

    pub fn get(&self, id: u32) -> Option<Book> {
        self.books.get(&id).map(|entry| entry.value().clone())
    }

    /// Case-insensitive substring match over topics, ordered by id.
    pub fn search(&self, topic: &str) -> Vec<Book> {
        let needle = topic.to_lowercase();
        let mut matches: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| entry.value().topic.to_lowercase().contains(&needle))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|book| book.id);
        matches
    }

    /// Applies a patch to the record with the given id.
    ///
    /// Returns the committed record, or `None` when the id is unknown.
    /// Negative prices are ignored rather than rejected. An explicit
    /// sequence number below the stored one leaves the record untouched:
    /// the local copy is already at least as new as the one being adopted.
    pub fn update(&self, id: u32, patch: &BookPatch) -> Option<Book> {
        let mut entry = self.books.get_mut(&id)?;
        let book = entry.value_mut();

        if let Some(sequence_number) = patch.sequence_number {
            if sequence_number < book.sequence_number {
                return Some(book.clone());
            }
        }

        if let Some(title) = &patch.title {
            book.title = title.clone();
        }
        if let Some(topic) = &patch.topic {
            book.topic = topic.clone();
        }
        if let Some(quantity) = patch.quantity {
            book.quantity = quantity;
        }
        if let Some(price) = patch.price {
            if price >= 0.0 {
                book.price = price;
            }
        }

        match patch.sequence_number {
            Some(sequence_number) => book.sequence_number = sequence_number,
            None => {
                if patch.touches_fields() {
                    book.sequence_number += 1;
                }
            }
        }

        Some(book.clone())
    }

    /// All records, ordered by id. Diagnostics only.
    pub fn dump(&self) -> Vec<Book> {
        let mut all: Vec<Book> = self
            .books
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|book| book.id);
        all
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}
