use serde::{Deserialize, Serialize};

/// Result of one stock mutation, as consumed by the dispatcher.
///
/// `message` is presentation text for the chat reply; presence of
/// `new_stock` is the machine-readable success signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_stock: Option<i64>,
}

impl StockOutcome {
    pub fn ok(message: impl Into<String>, new_stock: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            new_stock: Some(new_stock),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            new_stock: None,
        }
    }
}
