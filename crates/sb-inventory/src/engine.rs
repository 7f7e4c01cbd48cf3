//! Stock mutation engine.
//!
//! Thin layer over [`InventoryStore`] that executes the three mutations and
//! shapes the result into a user-facing [`StockOutcome`]. Storage failures
//! are logged with context and reported generically; the store guarantees
//! they never leave a stock write without its movement.

use std::sync::Arc;

use uuid::Uuid;

use crate::store::{AdjustOutcome, InventoryStore, RestockOutcome, SellOutcome};
use sb_protocol::{Actor, StockOutcome};

/// Executes stock mutations and renders their outcomes.
#[derive(Clone)]
pub struct StockEngine {
    store: Arc<dyn InventoryStore>,
}

impl StockEngine {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Record a sale of `qty` units, optionally at a unit price.
    pub async fn sell(
        &self,
        product_id: Uuid,
        qty: i64,
        price: Option<i64>,
        actor: Actor,
        raw_text: &str,
    ) -> StockOutcome {
        match self.store.sell(product_id, qty, price, actor, raw_text).await {
            Ok(SellOutcome::Sold { product }) => {
                tracing::info!(product = %product.name, qty, stock = product.stock, "sale recorded");
                let price_part = price
                    .map(|p| format!(" @ ${}", format_money(p)))
                    .unwrap_or_default();
                StockOutcome::ok(
                    format!(
                        "✅ Venta registrada: {} x{}{}\n📦 Stock restante: {}",
                        product.name, qty, price_part, product.stock
                    ),
                    product.stock,
                )
            }
            Ok(SellOutcome::InsufficientStock { available }) => StockOutcome::fail(format!(
                "❌ Stock insuficiente. Disponible: {available} unidades"
            )),
            Ok(SellOutcome::NotFound) => StockOutcome::fail("❌ Producto no encontrado"),
            Err(e) => {
                tracing::error!(error = %e, %product_id, "sale failed");
                StockOutcome::fail("❌ Error al procesar la venta")
            }
        }
    }

    /// Add `qty` units of stock.
    pub async fn restock(
        &self,
        product_id: Uuid,
        qty: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StockOutcome {
        match self.store.restock(product_id, qty, actor, raw_text).await {
            Ok(RestockOutcome::Restocked { product }) => {
                tracing::info!(product = %product.name, qty, stock = product.stock, "restock recorded");
                StockOutcome::ok(
                    format!(
                        "✅ Restock registrado: {} +{}\n📦 Stock total: {}",
                        product.name, qty, product.stock
                    ),
                    product.stock,
                )
            }
            Ok(RestockOutcome::NotFound) => StockOutcome::fail("❌ Producto no encontrado"),
            Err(e) => {
                tracing::error!(error = %e, %product_id, "restock failed");
                StockOutcome::fail("❌ Error al procesar el restock")
            }
        }
    }

    /// Set stock to the exact value `new_stock` (must be >= 0).
    pub async fn adjust(
        &self,
        product_id: Uuid,
        new_stock: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StockOutcome {
        if new_stock < 0 {
            return StockOutcome::fail("❌ El nuevo stock debe ser un número positivo");
        }
        match self.store.adjust(product_id, new_stock, actor, raw_text).await {
            Ok(AdjustOutcome::Adjusted { product, old_stock }) => {
                tracing::info!(
                    product = %product.name,
                    old_stock,
                    new_stock = product.stock,
                    "stock adjusted"
                );
                StockOutcome::ok(
                    format!(
                        "✅ Stock ajustado: {}\n📊 Antes: {} → Ahora: {}",
                        product.name, old_stock, product.stock
                    ),
                    product.stock,
                )
            }
            Ok(AdjustOutcome::NotFound) => StockOutcome::fail("❌ Producto no encontrado"),
            Err(e) => {
                tracing::error!(error = %e, %product_id, "adjust failed");
                StockOutcome::fail("❌ Error al ajustar el stock")
            }
        }
    }
}

/// Format a whole-unit amount with `.` thousands separators ("32000" as
/// "32.000"), matching the es-CO convention used in replies.
pub fn format_money(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
