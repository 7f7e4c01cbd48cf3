//! Shared application state for the Axum server.
//!
//! Supports two modes:
//! - **Database mode**: `PgStore` over a `PgPool` (production).
//! - **In-memory mode**: `MemoryStore` (tests and database-less dev runs).

use std::sync::Arc;

use crate::enrich::{DisabledEnricher, IntentEnricher};
use sb_inventory::{InventoryStore, MemoryStore, StockEngine};

/// Sample catalog for database-less dev runs.
const SAMPLE_CATALOG: &[(&str, Option<&str>, i64)] = &[
    ("iPhone 15 Pro", Some("Apple"), 12),
    ("Samsung Galaxy A54", Some("Samsung"), 25),
    ("MacBook Pro 16\"", Some("Apple"), 5),
    ("AirPods Pro", Some("Apple"), 30),
    ("iPad Air", Some("Apple"), 8),
    ("Galaxy Watch 6", Some("Samsung"), 15),
    ("Pixel 8", Some("Google"), 18),
    ("PlayStation 5", Some("Sony"), 3),
    ("Xbox Series X", Some("Microsoft"), 4),
    ("AirPods Max", Some("Apple"), 10),
];

/// Shared application state, cloned into each Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Product and movement storage.
    pub store: Arc<dyn InventoryStore>,
    /// Stock mutation engine over the same store.
    pub engine: StockEngine,
    /// AI fallback for messages the rule parser can't read.
    pub enricher: Arc<dyn IntentEnricher>,
}

impl AppState {
    /// Create state over any store and enricher.
    pub fn new(store: Arc<dyn InventoryStore>, enricher: Arc<dyn IntentEnricher>) -> Self {
        let engine = StockEngine::new(store.clone());
        Self {
            store,
            engine,
            enricher,
        }
    }

    /// Create state over a store with enrichment disabled (tests).
    pub fn with_store(store: Arc<dyn InventoryStore>) -> Self {
        Self::new(store, Arc::new(DisabledEnricher))
    }

    /// Create in-memory state with sample products for development / tests.
    pub fn with_sample_data() -> Self {
        Self::with_store(sample_store())
    }

    /// Create empty in-memory state (tests).
    pub fn empty() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }
}

/// In-memory store seeded with the sample catalog.
pub fn sample_store() -> Arc<dyn InventoryStore> {
    Arc::new(MemoryStore::with_catalog(SAMPLE_CATALOG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_data_is_seeded() {
        let state = AppState::with_sample_data();
        let products = state.store.list_inventory(true).await.unwrap();
        assert_eq!(products.len(), SAMPLE_CATALOG.len());
    }

    #[tokio::test]
    async fn empty_state_has_no_products() {
        let state = AppState::empty();
        let products = state.store.list_inventory(true).await.unwrap();
        assert!(products.is_empty());
    }
}
