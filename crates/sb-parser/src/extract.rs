//! Entity extraction heuristics over raw message text.
//!
//! Each extractor is best-effort and independently testable. The extractors
//! are shaped so the parser's output is always validator-clean except for a
//! possibly missing product name: quantity clamps to ≥ 1 and non-positive
//! prices are dropped rather than surfaced.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static QTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:[.,]\d+)?)\b").unwrap());

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\bpor\b|^\$)\s*\$?\s*([\d.,]+)").unwrap());

static BRAND_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmarca[:\s]+").unwrap());

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

static VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:se\s+)?(?:vendió|vendio|vendí|vendi|vendimos|agrega|añade|anade|suma\s+le|ingresa|ajusta|deja\s+en|pon\s+en|corrige|dame|muestra|compré|compre|recibimos)\b",
    )
    .unwrap()
});

static PRICE_PHRASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpor\s+\$?\s*[\d.,]+|^\s*\$\s*[\d.,]+").unwrap());

static LEADING_QTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+(?:[.,]\d+)?\s+").unwrap());

static TRAILING_QTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d+(?:[.,]\d+)?\s*$").unwrap());

static EDGE_CONNECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:a|en)\s+|\s+(?:a|en)\s*$").unwrap());

/// Words that end a brand phrase.
const BRAND_STOPS: &[&str] = &["por", "a", "en", "y"];

/// Extract the quantity: first standalone number in the raw text.
///
/// Decimals are floored; anything below 1 clamps to 1; no number at all
/// defaults to 1.
pub fn extract_quantity(raw: &str) -> i64 {
    let Some(cap) = QTY_RE.captures(raw) else {
        return 1;
    };
    let num: f64 = cap[1].replace(',', ".").parse().unwrap_or(1.0);
    (num.floor() as i64).max(1)
}

/// Extract a unit price: number after "por" or a leading currency marker.
///
/// `.` and `,` are thousands separators here, never decimal points
/// ("por 32.000" is 32000). Non-positive values yield `None`.
pub fn extract_price(raw: &str) -> Option<i64> {
    let cap = PRICE_RE.captures(raw)?;
    let digits: String = cap[1].chars().filter(|c| c.is_ascii_digit()).collect();
    let price: i64 = digits.parse().ok()?;
    (price > 0).then_some(price)
}

/// Extract the brand: words after the literal "marca", up to the next
/// punctuation, stop word, or number.
pub fn extract_brand(raw: &str) -> Option<String> {
    brand_phrase(raw).map(|(_, brand)| brand)
}

/// Locate the full brand phrase ("marca" plus the brand words) so the
/// product-name extractor can cut it out of the text.
fn brand_phrase(raw: &str) -> Option<(Range<usize>, String)> {
    let marker = BRAND_MARKER_RE.find(raw)?;
    let rest = &raw[marker.end()..];

    let mut words: Vec<&str> = Vec::new();
    let mut end = 0usize;
    for m in WORD_RE.find_iter(rest) {
        let token = m.as_str();
        let trimmed = token.trim_end_matches([',', ';', '.', ':']);
        if trimmed.is_empty()
            || BRAND_STOPS.contains(&trimmed.to_lowercase().as_str())
            || trimmed.starts_with(|c: char| c.is_ascii_digit())
        {
            break;
        }
        words.push(trimmed);
        end = m.start() + trimmed.len();
        if trimmed.len() != token.len() {
            // Trailing punctuation closes the phrase.
            break;
        }
    }

    if words.is_empty() {
        return None;
    }
    Some((marker.start()..marker.end() + end, words.join(" ")))
}

/// Extract the product name: what remains after stripping the leading
/// action verb, the brand phrase, the price phrase, a leading or trailing
/// bare number, currency symbols, and dangling connector words.
pub fn extract_product_name(raw: &str) -> Option<String> {
    let mut cleaned = VERB_RE.replace(raw, "").into_owned();

    if let Some((span, _)) = brand_phrase(&cleaned) {
        cleaned.replace_range(span, " ");
    }

    cleaned = PRICE_PHRASE_RE.replace(&cleaned, " ").into_owned();
    cleaned = LEADING_QTY_RE.replace(&cleaned, "").into_owned();
    cleaned = TRAILING_QTY_RE.replace(&cleaned, "").into_owned();
    cleaned = EDGE_CONNECTOR_RE.replace_all(&cleaned, " ").into_owned();
    cleaned = cleaned.replace('$', "");

    let name = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!name.is_empty()).then_some(name)
}
