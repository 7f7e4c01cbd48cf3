//! Intent detection over an ordered phrase table.

use sb_protocol::Intent;

/// Ordered rule table: first family with a contains-match wins.
///
/// Order is load-bearing because the phrase sets overlap: daily-sales
/// phrases contain sale verbs ("vendido hoy" vs "vendi"), and "stock"
/// appears in both inventory queries and adjust phrasing. The bare
/// inventory phrase "stock" shadows the adjust phrase "actualiza el
/// stock", so that wording always reads as an inventory query. Phrases
/// are written in normalized form (lowercase, no diacritics).
const INTENT_RULES: &[(Intent, &[&str])] = &[
    (
        Intent::DailySales,
        &[
            "cuanto se vendio",
            "cuanto vendi",
            "ventas de hoy",
            "venta de hoy",
            "vendido hoy",
            "sales today",
        ],
    ),
    (
        Intent::Inventory,
        &["dame el inventario", "inventario", "dame stock", "stock"],
    ),
    (Intent::Sale, &["se vendio", "vendi", "vendimos"]),
    (
        Intent::Restock,
        &["agrega", "anade", "suma le", "ingresa", "compre", "recibimos"],
    ),
    (
        Intent::Adjust,
        &["ajusta", "deja en", "pon en", "corrige", "actualiza el stock"],
    ),
];

/// Detect the intent of a message. Expects normalized text.
pub fn detect_intent(normalized: &str) -> Intent {
    for (intent, phrases) in INTENT_RULES {
        if matches_any(normalized, phrases) {
            return *intent;
        }
    }
    Intent::Unknown
}

/// Check if the text contains any of the given phrases.
fn matches_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}
