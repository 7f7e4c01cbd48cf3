use serde::{Deserialize, Serialize};

/// User goal inferred from one chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Catalog query ("dame el inventario").
    Inventory,
    /// Record a sale, decrementing stock.
    Sale,
    /// Add stock, creating the product on first reference.
    Restock,
    /// Set stock to an exact value.
    Adjust,
    /// Summary of today's sales.
    DailySales,
    /// Could not be interpreted; never mutates anything.
    Unknown,
}

impl Intent {
    /// Intents that mutate stock and therefore need a product name.
    pub fn is_mutation(self) -> bool {
        matches!(self, Intent::Sale | Intent::Restock | Intent::Adjust)
    }
}

/// Identity of the chat user behind a message.
///
/// Supplied by the transport layer after authentication; recorded verbatim
/// on every movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub chat_id: i64,
    pub user_id: i64,
    pub message_id: i64,
}

/// Structured interpretation of one free-text message.
///
/// Produced fresh per message by the rule parser or the AI enricher and
/// never persisted. `quantity` doubles as the target stock value for
/// `Intent::Adjust`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub intent: Intent,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    /// Positive integer, defaults to 1 when the text carries no number.
    pub quantity: i64,
    /// Unit price in whole currency units (sales only).
    pub price: Option<i64>,
    pub raw_text: String,
}

impl ParsedMessage {
    /// Safe fallback: no entities, no mutation.
    pub fn unknown(raw_text: impl Into<String>) -> Self {
        Self {
            intent: Intent::Unknown,
            product_name: None,
            brand: None,
            quantity: 1,
            price: None,
            raw_text: raw_text.into(),
        }
    }
}
