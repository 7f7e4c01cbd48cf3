//! Read-only inventory projection.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;
use sb_inventory::InventoryStore;

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    /// Include products with zero stock.
    #[serde(default)]
    pub include_empty: bool,
}

/// Summary view of a product (for list responses).
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub brand: Option<String>,
    pub sku: String,
    pub stock: i64,
    pub last_movement_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// GET /api/v1/inventory — list products.
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Json<Vec<ProductSummary>>> {
    let products = state.store.list_inventory(query.include_empty).await?;
    let summaries = products
        .into_iter()
        .map(|p| ProductSummary {
            name: p.name,
            brand: p.brand,
            sku: p.sku,
            stock: p.stock,
            last_movement_at: p.last_movement_at,
        })
        .collect();
    Ok(Json(summaries))
}
