//! API route definitions and router builder.

pub mod health;
pub mod inventory;
pub mod messages;
pub mod movements;
pub mod sales;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/messages", post(messages::handle_message))
        .route("/inventory", get(inventory::list_inventory))
        .route("/movements", get(movements::list_movements))
        .route("/sales/today", get(sales::sales_today));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
