//! Read-only movement history.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;
use sb_inventory::InventoryStore;
use sb_protocol::MovementView;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/movements — most recent movements first.
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementsQuery>,
) -> ApiResult<Json<Vec<MovementView>>> {
    let limit = query
        .limit
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT);
    let movements = state.store.recent_movements(limit).await?;
    Ok(Json(movements))
}
