//! Inventory core for Shelfbot.
//!
//! Provides the `InventoryStore` abstraction over product resolution, the
//! three stock mutations (sell, restock, adjust), and the read-only query
//! projections (inventory list, movement history, daily sales). Two impls:
//! - `PgStore`: PostgreSQL via sqlx, single conditional statements inside
//!   transactions so stock writes and movement appends succeed or fail
//!   together.
//! - `MemoryStore`: all platforms, one write lock across each mutation;
//!   used by tests and by the bot when no database is configured.
//!
//! `StockEngine` sits on top and turns store results into user-facing
//! `StockOutcome` replies.

pub mod engine;
pub mod error;
pub mod memory;
pub mod pg;
pub mod store;

pub use engine::{StockEngine, format_money};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{AdjustOutcome, InventoryStore, RestockOutcome, SellOutcome, SEARCH_LIMIT};
