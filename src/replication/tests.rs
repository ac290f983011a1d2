//! Replication Coordinator Tests
//!
//! Exercises the standalone and degraded-mode paths: no peers configured,
//! or every configured peer unreachable. Multi-node behavior (conflict
//! rounds, broadcasts, read-repair chains) is covered by the integration
//! tests in `tests/cluster.rs`, which run real in-process servers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::replication::coordinator::{ReplicaCoordinator, contains_address};
    use crate::replication::error::ReplicationError;
    use crate::store::books::{Book, BookPatch, BookStore};

    // Nothing listens on port 1; connections are refused immediately.
    const DEAD_PEER: &str = "http://127.0.0.1:1";

    fn seeded_store() -> Arc<BookStore> {
        let store = Arc::new(BookStore::new());
        store.insert(Book {
            id: 1,
            title: "RPCs for Dummies".to_string(),
            topic: "Distributed Systems".to_string(),
            quantity: 5,
            price: 50.0,
            sequence_number: 0,
        });
        store
    }

    fn standalone(store: Arc<BookStore>) -> ReplicaCoordinator {
        ReplicaCoordinator::new(store, vec![], "http://127.0.0.1:5000".to_string())
    }

    fn with_dead_peers(store: Arc<BookStore>) -> ReplicaCoordinator {
        ReplicaCoordinator::new(
            store,
            vec![DEAD_PEER.to_string()],
            "http://127.0.0.1:5000".to_string(),
        )
    }

    fn quantity_patch(quantity: u32) -> BookPatch {
        BookPatch {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_standalone_update_applies_directly() {
        let store = seeded_store();
        let coordinator = standalone(store.clone());

        let committed = coordinator.update(1, &quantity_patch(4)).await.unwrap();

        assert_eq!(committed.quantity, 4);
        assert_eq!(committed.sequence_number, 1);
        assert_eq!(store.get(1).unwrap().sequence_number, 1);
    }

    #[tokio::test]
    async fn test_standalone_update_unknown_id() {
        let coordinator = standalone(seeded_store());
        let result = coordinator.update(99, &quantity_patch(4)).await;
        assert_eq!(result, Err(ReplicationError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_update_with_unreachable_peers_commits_locally() {
        // All peers down: no conflict check is possible, the write proceeds
        // with a local increment (availability over consistency).
        let store = seeded_store();
        let coordinator = with_dead_peers(store.clone());

        let committed = coordinator.update(1, &quantity_patch(4)).await.unwrap();

        assert_eq!(committed.quantity, 4);
        assert_eq!(committed.sequence_number, 1);
        assert!(coordinator.is_fresh(1));
    }

    #[tokio::test]
    async fn test_repeated_updates_keep_incrementing() {
        let store = seeded_store();
        let coordinator = with_dead_peers(store.clone());

        coordinator.update(1, &quantity_patch(4)).await.unwrap();
        let committed = coordinator.update(1, &quantity_patch(3)).await.unwrap();

        assert_eq!(committed.quantity, 3);
        assert_eq!(committed.sequence_number, 2);
    }

    #[tokio::test]
    async fn test_get_with_no_peers_marks_fresh() {
        let store = seeded_store();
        let coordinator = standalone(store);

        let book = coordinator.get(1, None, &[]).await.unwrap();
        assert_eq!(book.sequence_number, 0);
        assert!(coordinator.is_fresh(1));

        // Second read takes the freshness short-circuit.
        let book = coordinator.get(1, None, &[]).await.unwrap();
        assert_eq!(book.quantity, 5);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let coordinator = standalone(seeded_store());
        let result = coordinator.get(42, None, &[]).await;
        assert_eq!(result, Err(ReplicationError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_get_with_all_peers_visited_returns_local_copy() {
        let store = seeded_store();
        let coordinator = with_dead_peers(store);

        let visited = vec![DEAD_PEER.to_string()];
        let book = coordinator.get(1, None, &visited).await.unwrap();

        assert_eq!(book.sequence_number, 0);
        assert!(coordinator.is_fresh(1));
    }

    #[tokio::test]
    async fn test_get_with_unreachable_pool_falls_back_to_local_copy() {
        // The candidate pool empties through unreachability rather than the
        // visited set; the local copy is still treated as authoritative,
        // even when an earlier hop hinted at something newer.
        let store = seeded_store();
        let coordinator = with_dead_peers(store);

        let book = coordinator.get(1, Some(3), &[]).await.unwrap();

        assert_eq!(book.sequence_number, 0);
        assert!(coordinator.is_fresh(1));
    }

    #[test]
    fn test_contains_address_ignores_scheme_and_trailing_slash() {
        let visited = vec!["https://10.0.0.2:5000/".to_string()];
        assert!(contains_address(&visited, "http://10.0.0.2:5000"));
        assert!(!contains_address(&visited, "http://10.0.0.3:5000"));
    }
}
