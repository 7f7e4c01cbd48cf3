//! Rule-based message parsing for Shelfbot.
//!
//! Turns one line of free chat text into a structured [`ParsedMessage`]:
//! intent detection over an ordered phrase table, plus heuristic extraction
//! of quantity, unit price, brand, and product name. Parsing never fails —
//! anything the rules can't read comes back as `Intent::Unknown` with safe
//! defaults, and the bot decides whether to hand it to the AI enricher.

pub mod extract;
pub mod intent;
pub mod normalize;
pub mod validate;

pub use extract::{extract_brand, extract_price, extract_product_name, extract_quantity};
pub use intent::detect_intent;
pub use normalize::normalize;
pub use validate::{Validation, validate};

use sb_protocol::{Intent, ParsedMessage};

/// Parse one free-text message. Always succeeds.
///
/// Intent detection runs on the normalized text; entity extraction runs on
/// the raw text so display names keep their original casing and accents.
/// Inventory queries target the whole catalog, so their product name is
/// always `None`.
pub fn parse_message(raw_text: &str) -> ParsedMessage {
    let normalized = normalize(raw_text);
    let intent = detect_intent(&normalized);

    let product_name = if intent == Intent::Inventory {
        None
    } else {
        extract_product_name(raw_text)
    };

    ParsedMessage {
        intent,
        product_name,
        brand: extract_brand(raw_text),
        quantity: extract_quantity(raw_text),
        price: extract_price(raw_text),
        raw_text: raw_text.to_string(),
    }
}
