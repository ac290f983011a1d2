//! Catalog Node Assembly
//!
//! Wires one replica together: record store, replica coordinator, cache
//! notifier, and the merged HTTP router (public catalog surface plus the
//! peer-facing `/rep` surface).

use std::sync::Arc;

use axum::{Extension, Router};

use crate::cache::CacheNotifier;
use crate::catalog;
use crate::config::Config;
use crate::replication::coordinator::ReplicaCoordinator;
use crate::replication::handlers as replication_handlers;
use crate::store::books::BookStore;

pub struct CatalogNode {
    pub store: Arc<BookStore>,
    pub coordinator: Arc<ReplicaCoordinator>,
    pub notifier: Arc<CacheNotifier>,
}

impl CatalogNode {
    pub fn new(
        store: Arc<BookStore>,
        peer_addresses: Vec<String>,
        public_address: String,
        front_end_address: Option<String>,
    ) -> Self {
        let coordinator = Arc::new(ReplicaCoordinator::new(
            store.clone(),
            peer_addresses,
            public_address,
        ));
        let notifier = Arc::new(CacheNotifier::new(front_end_address));
        Self {
            store,
            coordinator,
            notifier,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(BookStore::with_seed_data()),
            config.peer_addresses.clone(),
            config.public_address.clone(),
            config.front_end_address.clone(),
        )
    }

    /// The full router for this replica. Serve it with
    /// `into_make_service_with_connect_info::<SocketAddr>` so the peer
    /// handlers can see the requester's remote address.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(catalog::handlers::routes())
            .merge(replication_handlers::routes())
            .layer(Extension(self.store.clone()))
            .layer(Extension(self.coordinator.clone()))
            .layer(Extension(self.notifier.clone()))
    }
}
