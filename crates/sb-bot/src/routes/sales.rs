//! Read-only daily sales report.

use axum::Json;
use axum::extract::State;

use crate::error::ApiResult;
use crate::state::AppState;
use sb_inventory::InventoryStore;
use sb_protocol::DailySales;

/// GET /api/v1/sales/today — today's sales with totals.
pub async fn sales_today(State(state): State<AppState>) -> ApiResult<Json<DailySales>> {
    let daily = state.store.daily_sales().await?;
    Ok(Json(daily))
}
