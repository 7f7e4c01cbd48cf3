//! Inventory storage abstraction.
//!
//! `InventoryStore` is the seam between the dispatcher and persistence.
//! Two impls: `PgStore` (PostgreSQL, production) and `MemoryStore`
//! (tests and database-less dev mode, in `memory.rs`).
//!
//! Atomicity contract: `sell` checks and decrements stock as one
//! indivisible step, and `adjust` reads the old stock and writes the new
//! one as one indivisible step. Every mutation appends its movement in the
//! same transaction or lock scope as the stock write; a stock write without
//! its movement (or vice versa) must be impossible.

use async_trait::async_trait;
use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use sb_protocol::{Actor, DailySales, MovementView, Product};

/// Upper bound on `search` results.
pub const SEARCH_LIMIT: usize = 10;

/// Result of a conditional sale.
#[derive(Debug, Clone)]
pub enum SellOutcome {
    /// Stock was decremented; `product` carries the new stock level.
    Sold { product: Product },
    /// Precondition failed: requested more than available. No mutation.
    InsufficientStock { available: i64 },
    NotFound,
}

/// Result of a restock.
#[derive(Debug, Clone)]
pub enum RestockOutcome {
    Restocked { product: Product },
    NotFound,
}

/// Result of an absolute stock adjustment.
#[derive(Debug, Clone)]
pub enum AdjustOutcome {
    /// Stock was set; `old_stock` is the value read in the same atomic step.
    Adjusted { product: Product, old_stock: i64 },
    NotFound,
}

/// Storage operations for products and their movement log.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Look up by exact normalized (name, brand) pair, creating the product
    /// with stock 0 and a fresh sku on miss. Restock flows only.
    async fn find_or_create(&self, name: &str, brand: Option<&str>) -> StoreResult<Product>;

    /// Substring match on normalized name, optionally filtered by a
    /// normalized brand substring. At most [`SEARCH_LIMIT`] results;
    /// callers branch on zero/one/many.
    async fn search(&self, name: &str, brand: Option<&str>) -> StoreResult<Vec<Product>>;

    async fn get(&self, product_id: Uuid) -> StoreResult<Option<Product>>;

    /// Atomically decrement stock by `qty` if `stock >= qty`, appending a
    /// SALE movement on success.
    async fn sell(
        &self,
        product_id: Uuid,
        qty: i64,
        price: Option<i64>,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<SellOutcome>;

    /// Unconditionally increment stock by `qty`, appending a RESTOCK
    /// movement.
    async fn restock(
        &self,
        product_id: Uuid,
        qty: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<RestockOutcome>;

    /// Atomically set stock to `new_stock` (caller guarantees `>= 0`) and
    /// report the previous value, appending an ADJUST movement with the
    /// signed delta.
    async fn adjust(
        &self,
        product_id: Uuid,
        new_stock: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<AdjustOutcome>;

    /// All products, or only those with stock > 0. Sorted by name, brand.
    async fn list_inventory(&self, include_empty: bool) -> StoreResult<Vec<Product>>;

    /// Most recent movements first, joined with product display fields.
    async fn recent_movements(&self, limit: usize) -> StoreResult<Vec<MovementView>>;

    /// Most recent movements of one product.
    async fn product_movements(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<MovementView>>;

    /// Today's SALE movements (server-local day) with totals.
    async fn daily_sales(&self) -> StoreResult<DailySales>;
}

/// UTC bounds `[start, end)` of the current server-local day.
pub(crate) fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    let start = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump: fall back to reading it as UTC.
        LocalResult::None => DateTime::from_naive_utc_and_offset(midnight, Utc),
    };
    (start, start + chrono::Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_span_24_hours() {
        let (start, end) = local_day_bounds();
        assert_eq!(end - start, chrono::Duration::days(1));
    }

    #[test]
    fn now_falls_inside_today() {
        let (start, end) = local_day_bounds();
        let now = Utc::now();
        assert!(start <= now && now < end);
    }
}
