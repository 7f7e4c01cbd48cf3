//! AI intent enrichment for messages the rule parser can't read.
//!
//! The dispatcher hands a message here when the local parse came back
//! Unknown, when a mutation intent is missing its product name, or when the
//! message is long enough that the heuristics get unreliable. An enriched
//! result fully replaces the local parse.
//!
//! Two impls:
//! - **Disabled** (local): always misses; selected at startup when no API
//!   key is configured or the flag is off.
//! - **OpenAI** (cloud): chat-completions with a strict JSON schema.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AiConfig;
use sb_protocol::ParsedMessage;

pub use openai::OpenAiEnricher;

/// Trait for enrichers that re-parse natural language into a structured
/// message.
#[async_trait]
pub trait IntentEnricher: Send + Sync {
    /// Re-parse the raw text. Returns None if the enricher is unavailable
    /// or produced nothing usable; the caller keeps its local parse.
    async fn enrich(&self, raw_text: &str) -> Option<ParsedMessage>;

    /// Name of this enricher (for logging).
    fn name(&self) -> &str;
}

/// No-op enricher used when AI enrichment is not configured.
pub struct DisabledEnricher;

#[async_trait]
impl IntentEnricher for DisabledEnricher {
    async fn enrich(&self, _raw_text: &str) -> Option<ParsedMessage> {
        None
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Select the enricher once at startup. Requires both the flag and a key;
/// there is no runtime credential sniffing.
pub fn from_config(config: &AiConfig) -> Arc<dyn IntentEnricher> {
    match &config.api_key {
        Some(api_key) if config.enabled => {
            tracing::info!(model = %config.model, "AI intent enrichment enabled");
            Arc::new(OpenAiEnricher::new(
                api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
                config.timeout,
            ))
        }
        _ => {
            tracing::info!("AI intent enrichment disabled");
            Arc::new(DisabledEnricher)
        }
    }
}
