use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One catalog entry.
///
/// `(name_normalized, brand_normalized)` is unique across the catalog and
/// is the only lookup key the resolver uses. `stock` never goes negative;
/// all mutations flow through the stock engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// Display name as the user first wrote it.
    pub name: String,
    /// Canonical lookup key (lowercase, no diacritics, single spaces).
    pub name_normalized: String,
    pub brand: Option<String>,
    pub brand_normalized: Option<String>,
    /// Opaque short code, unique, generated at creation.
    pub sku: String,
    pub stock: i64,
    /// Set on every successful mutation.
    pub last_movement_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Human label: "name (brand)" or just "name".
    pub fn display_label(&self) -> String {
        match &self.brand {
            Some(brand) => format!("{} ({})", self.name, brand),
            None => self.name.clone(),
        }
    }
}

/// Generate an 8-character opaque short code for a new product.
pub fn new_sku() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::now_v7(),
            name: "Cera para el cabello".into(),
            name_normalized: "cera para el cabello".into(),
            brand: Some("Nativo".into()),
            brand_normalized: Some("nativo".into()),
            sku: new_sku(),
            stock: 10,
            last_movement_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn display_label_with_brand() {
        assert_eq!(sample().display_label(), "Cera para el cabello (Nativo)");
    }

    #[test]
    fn display_label_without_brand() {
        let mut p = sample();
        p.brand = None;
        assert_eq!(p.display_label(), "Cera para el cabello");
    }

    #[test]
    fn sku_is_short_and_unique() {
        let a = new_sku();
        let b = new_sku();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn product_roundtrip() {
        let p = sample();
        let json = serde_json::to_string(&p).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
