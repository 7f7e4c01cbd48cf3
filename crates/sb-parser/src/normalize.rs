//! Canonical text form used for every lookup and comparison key.

use unicode_normalization::UnicodeNormalization;

/// Normalize text: lowercase, strip diacritics, collapse whitespace.
///
/// Diacritics are removed by NFD-decomposing and dropping the combining
/// marks in U+0300–U+036F, so "Café" and "cafe" normalize identically
/// (and "ñ" folds to "n"). Pure and idempotent.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("  Cera Para El Cabello  "), "cera para el cabello");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("vendí"), "vendi");
        assert_eq!(normalize("añade"), "anade");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("cera \t  para\nel cabello"), "cera para el cabello");
    }

    #[test]
    fn idempotent() {
        for input in ["Café  con LECHE", "vendí 2 cera", "  ", "ñandú"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn accent_insensitive_equality() {
        assert_eq!(normalize("Café"), normalize("cafe"));
        assert_eq!(normalize("Champú"), normalize("CHAMPU"));
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
