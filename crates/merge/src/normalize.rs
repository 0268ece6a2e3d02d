//! Join-key canonicalization for tolerant cross-source matching.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize a raw join key: trim, NFKC-fold (full-width/half-width
/// variants and composed forms collapse to one form), lowercase, then strip
/// all remaining whitespace including the ideographic space U+3000.
///
/// Two keys refer to the same entity iff their normalized forms are
/// byte-equal. Pure and total; the empty string normalizes to itself and
/// never matches anything.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .nfkc()
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_width_and_spacing_variants_collapse() {
        let canonical = normalize_key("Tanaka");
        assert_eq!(normalize_key(" tanaka "), canonical);
        assert_eq!(normalize_key("ｔａｎａｋａ"), canonical);
        assert_eq!(normalize_key("ＴＡＮＡＫＡ"), canonical);
        assert_eq!(canonical, "tanaka");
    }

    #[test]
    fn ideographic_space_is_removed() {
        assert_eq!(normalize_key("田中　太郎"), "田中太郎");
        assert_eq!(normalize_key("田中 太郎"), "田中太郎");
    }

    #[test]
    fn full_width_digits_fold() {
        assert_eq!(normalize_key("１００２"), "1002");
    }

    #[test]
    fn half_width_katakana_composes() {
        assert_eq!(normalize_key("ﾀﾅｶ"), normalize_key("タナカ"));
    }

    #[test]
    fn empty_and_blank_normalize_to_empty() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("   "), "");
        assert_eq!(normalize_key("　"), "");
    }
}
