//! E2E tests for the OpenAI enricher against a mock server.
//!
//! Exercises the full fallback path: local parse misses, the enricher is
//! consulted over HTTP, and its reply (or failure) decides the dispatch.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::TestHarness;
use sb_bot::enrich::OpenAiEnricher;

const CATALOG: &[(&str, Option<&str>, i64)] = &[("shampoo", None, 9)];

fn enricher(server: &MockServer) -> Arc<OpenAiEnricher> {
    Arc::new(OpenAiEnricher::new(
        "sk-test".into(),
        "gpt-4.1-mini".into(),
        server.uri(),
        Duration::from_secs(2),
    ))
}

/// Wrap a schema reply in the chat-completions response envelope.
fn completion(content: &serde_json::Value) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content.to_string() } }
        ]
    })
}

#[tokio::test]
async fn e2e_enricher_rescues_colloquial_sale() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&json!({
            "intent": "SALE",
            "product_name": "shampoo",
            "brand": null,
            "quantity": 3,
            "price": null,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let h = TestHarness::with_enricher(CATALOG, enricher(&server));

    let reply = h.reply("me llevaron tres de los del pelo").await;
    assert!(reply.contains("Venta registrada"), "{reply}");
    assert!(reply.contains("Stock restante: 6"), "{reply}");
    assert_eq!(h.stock_of("shampoo").await, 6);
}

#[tokio::test]
async fn e2e_malformed_reply_falls_back_to_local_parse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [ { "message": { "content": "no json here" } } ] })),
        )
        .mount(&server)
        .await;

    let h = TestHarness::with_enricher(CATALOG, enricher(&server));

    let reply = h.reply("qué onda con el negocio hoy").await;
    assert!(reply.contains("No te entendí"), "{reply}");
    assert_eq!(h.stock_of("shampoo").await, 9);
}

#[tokio::test]
async fn e2e_server_error_falls_back_to_local_parse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = TestHarness::with_enricher(CATALOG, enricher(&server));

    // Local parse still runs; the enricher failure must not break a long
    // message the rules already read into a (wrong) product name.
    let reply = h.reply("vendí 2 shampoo del grande para hotel").await;
    assert!(reply.contains("Producto no encontrado"), "{reply}");
    assert_eq!(h.stock_of("shampoo").await, 9);
}

#[tokio::test]
async fn e2e_invalid_mutation_downgrades_to_unknown() {
    let server = MockServer::start().await;
    // Schema-valid JSON, but a mutation without a product name.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&json!({
            "intent": "SALE",
            "product_name": null,
            "brand": null,
            "quantity": 2,
            "price": null,
        }))))
        .mount(&server)
        .await;

    let h = TestHarness::with_enricher(CATALOG, enricher(&server));

    let reply = h.reply("vendí dos de esas cosas raras").await;
    assert!(reply.contains("No te entendí"), "{reply}");
    assert_eq!(h.stock_of("shampoo").await, 9);
}

#[tokio::test]
async fn e2e_enricher_timeout_is_survivable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(10))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let enricher = Arc::new(OpenAiEnricher::new(
        "sk-test".into(),
        "gpt-4.1-mini".into(),
        server.uri(),
        Duration::from_millis(100),
    ));
    let h = TestHarness::with_enricher(CATALOG, enricher);

    let reply = h.reply("algo totalmente incomprensible").await;
    assert!(reply.contains("No te entendí"), "{reply}");
}
