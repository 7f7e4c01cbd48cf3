//! Sanity checks over a parsed message.
//!
//! Both parser paths (rules and AI enricher) run their output through
//! [`validate`] before dispatch, so a misbehaving extractor or external
//! model can never push a malformed structure at the stock engine.

use sb_protocol::ParsedMessage;

/// Outcome of validating a [`ParsedMessage`].
#[derive(Debug, Clone)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate a parsed message.
///
/// Rejects mutation intents without a product name, non-positive
/// quantities, and non-positive prices. Callers downgrade invalid
/// messages to `Intent::Unknown` instead of propagating them.
pub fn validate(msg: &ParsedMessage) -> Validation {
    let mut errors = Vec::new();

    if msg.intent.is_mutation()
        && msg
            .product_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
    {
        errors.push(format!(
            "intent {:?} requires a product name",
            msg.intent
        ));
    }

    if msg.quantity < 1 {
        errors.push(format!("quantity must be positive, got {}", msg.quantity));
    }

    if let Some(price) = msg.price
        && price < 1
    {
        errors.push(format!("price must be positive, got {price}"));
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}
