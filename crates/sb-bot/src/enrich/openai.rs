//! OpenAI intent enricher — chat completions with a strict JSON schema.
//!
//! The response format pins the model to exactly the fields of
//! `ParsedMessage`, so a well-behaved reply deserializes directly. Anything
//! else (transport error, timeout, missing content, schema drift) makes the
//! enricher miss and the caller falls back to its local parse. A reply that
//! deserializes but fails validation is downgraded to a safe Unknown so a
//! hallucinated mutation can never reach the stock engine.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::time::timeout;

use super::IntentEnricher;
use sb_parser::validate;
use sb_protocol::{Intent, ParsedMessage};

const SYSTEM_PROMPT: &str = "Eres un parser de intenciones para un bot de inventario. \
Tu salida debe ser JSON válido. \
Solo usa estos intents: INVENTORY, SALE, RESTOCK, ADJUST, DAILY_SALES, UNKNOWN. \
quantity debe ser entero positivo. Si no hay cantidad, usa 1. \
price es precio unitario entero positivo o null. \
Si no hay producto claro, product_name debe ser null. \
No inventes campos ni agregues texto fuera del JSON.";

/// Intent enricher backed by the OpenAI chat-completions API.
pub struct OpenAiEnricher {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiEnricher {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
            timeout,
        }
    }
}

#[async_trait]
impl IntentEnricher for OpenAiEnricher {
    async fn enrich(&self, raw_text: &str) -> Option<ParsedMessage> {
        let result = timeout(self.timeout, self.call_completions(raw_text)).await;

        match result {
            Ok(Ok(reply)) => Some(accept_reply(raw_text, reply)),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "openai enrichment failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "openai enrichment timed out"
                );
                None
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

impl OpenAiEnricher {
    /// Call the chat-completions endpoint and deserialize the schema reply.
    async fn call_completions(&self, raw_text: &str) -> anyhow::Result<AiReply> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Mensaje del usuario: \"{raw_text}\"") },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "inventory_intent",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "intent": {
                                "type": "string",
                                "enum": ["INVENTORY", "SALE", "RESTOCK", "ADJUST", "DAILY_SALES", "UNKNOWN"],
                            },
                            "product_name": { "type": ["string", "null"] },
                            "brand": { "type": ["string", "null"] },
                            "quantity": { "type": "integer", "minimum": 1 },
                            "price": { "type": ["integer", "null"], "minimum": 1 },
                        },
                        "required": ["intent", "product_name", "brand", "quantity", "price"],
                    },
                },
            },
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("openai returned status {}", response.status());
        }

        let payload: CompletionsResponse = response.json().await?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("no content in openai response"))?;

        Ok(serde_json::from_str(&content)?)
    }
}

/// Relevant slice of the chat-completions response envelope.
#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// The schema-pinned reply body.
#[derive(Debug, Deserialize)]
struct AiReply {
    intent: Intent,
    product_name: Option<String>,
    brand: Option<String>,
    quantity: i64,
    price: Option<i64>,
}

/// Turn a schema reply into a `ParsedMessage`, downgrading to Unknown when
/// it fails validation.
fn accept_reply(raw_text: &str, reply: AiReply) -> ParsedMessage {
    let non_empty = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let parsed = ParsedMessage {
        intent: reply.intent,
        product_name: non_empty(reply.product_name),
        brand: non_empty(reply.brand),
        quantity: reply.quantity.max(1),
        price: reply.price,
        raw_text: raw_text.to_string(),
    };

    let validation = validate(&parsed);
    if !validation.valid {
        tracing::warn!(errors = ?validation.errors, "enriched parse failed validation");
        return ParsedMessage::unknown(raw_text);
    }
    parsed
}
