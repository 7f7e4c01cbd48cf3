use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::message::Actor;

/// Kind of stock-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Sale,
    Restock,
    Adjust,
}

impl MovementKind {
    /// Canonical storage tag, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Sale => "SALE",
            MovementKind::Restock => "RESTOCK",
            MovementKind::Adjust => "ADJUST",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown movement kind: {0}")]
pub struct UnknownMovementKind(pub String);

impl std::str::FromStr for MovementKind {
    type Err = UnknownMovementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SALE" => Ok(MovementKind::Sale),
            "RESTOCK" => Ok(MovementKind::Restock),
            "ADJUST" => Ok(MovementKind::Adjust),
            other => Err(UnknownMovementKind(other.to_string())),
        }
    }
}

/// Immutable audit record of one stock mutation.
///
/// Append-only: exactly one per successful mutation, never updated or
/// deleted. `qty` is the non-negative magnitude of the change; `delta` is
/// the signed stock change (negative for sales, positive for restocks,
/// either for adjustments), so the direction of an ADJUST is never lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub kind: MovementKind,
    pub product_id: Uuid,
    /// Magnitude of the change, `delta.abs()`.
    pub qty: i64,
    /// Signed stock change.
    pub delta: i64,
    /// Unit price, sales only.
    pub price: Option<i64>,
    /// Original message that caused this movement.
    pub raw_text: String,
    pub actor: Actor,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    pub fn new(
        kind: MovementKind,
        product_id: Uuid,
        delta: i64,
        price: Option<i64>,
        raw_text: impl Into<String>,
        actor: Actor,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            product_id,
            qty: delta.abs(),
            delta,
            price,
            raw_text: raw_text.into(),
            actor,
            created_at: Utc::now(),
        }
    }
}

/// Movement joined with its product's display fields, for history views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementView {
    pub kind: MovementKind,
    pub product_name: String,
    pub product_brand: Option<String>,
    pub qty: i64,
    pub delta: i64,
    pub price: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// One sale line in the daily summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_name: String,
    pub product_brand: Option<String>,
    pub qty: i64,
    pub price: Option<i64>,
    /// `qty * price`, with a missing price counted as 0.
    pub subtotal: i64,
    pub created_at: DateTime<Utc>,
}

/// Aggregation of today's sales.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySales {
    pub sales: Vec<SaleLine>,
    pub total_quantity: i64,
    pub total_revenue: i64,
}
