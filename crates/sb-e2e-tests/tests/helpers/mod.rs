//! Shared test harness for E2E integration tests.
//!
//! Drives the full stack through the HTTP surface: router, dispatcher,
//! parser, enricher, stock engine, and store, all real code paths over an
//! in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sb_bot::enrich::IntentEnricher;
use sb_bot::routes::build_router;
use sb_bot::state::AppState;
use sb_inventory::{InventoryStore, MemoryStore};

/// End-to-end test harness over the bot's HTTP router.
pub struct TestHarness {
    /// Application state (in-memory store, no DB).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
}

impl TestHarness {
    /// Create a harness over a seeded catalog with enrichment disabled.
    pub fn with_catalog(items: &[(&str, Option<&str>, i64)]) -> Self {
        Self::build(AppState::with_store(Arc::new(MemoryStore::with_catalog(
            items,
        ))))
    }

    /// Create a harness with an empty catalog.
    pub fn empty() -> Self {
        Self::build(AppState::empty())
    }

    /// Create a harness over a seeded catalog with the given enricher.
    pub fn with_enricher(
        items: &[(&str, Option<&str>, i64)],
        enricher: Arc<dyn IntentEnricher>,
    ) -> Self {
        let store: Arc<dyn InventoryStore> = Arc::new(MemoryStore::with_catalog(items));
        Self::build(AppState::new(store, enricher))
    }

    fn build(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Post one chat message (POST /api/v1/messages).
    /// Returns (HTTP status code, response JSON body).
    pub async fn send_message(&self, text: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({
            "text": text,
            "actor": { "chat_id": 1, "user_id": 2, "message_id": 3 },
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/api/v1/messages")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// Post one message and return the reply text, asserting HTTP 200.
    pub async fn reply(&self, text: &str) -> String {
        let (status, json) = self.send_message(text).await;
        assert_eq!(status, StatusCode::OK, "message '{text}' failed: {json}");
        json["reply"].as_str().unwrap().to_string()
    }

    /// GET a JSON endpoint.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// Current stock of the only product matching `name`.
    pub async fn stock_of(&self, name: &str) -> i64 {
        let products = self.state.store.search(name, None).await.unwrap();
        assert_eq!(products.len(), 1, "expected one product for '{name}'");
        products[0].stock
    }
}
