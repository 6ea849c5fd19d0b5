//! Go identifier character classes (`letter = \p{L} | "_"`, `digit = \p{Nd}`).
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*$").expect("identifier pattern compiles")
});

static NON_IDENTIFIER_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}_]").expect("identifier char pattern compiles"));

static DECIMAL_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Nd}$").expect("digit pattern compiles"));

static LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}_]$").expect("letter pattern compiles"));

/// Whether `s` lexes as a single Go identifier (keywords not excluded).
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Letters and `_`.
pub fn is_letter(c: char) -> bool {
    LETTER.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Unicode decimal digits (`Nd`), not every numeric char.
pub fn is_decimal_digit(c: char) -> bool {
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Replaces every char that cannot appear in an identifier with `_` and
/// prefixes `_` when the result cannot start one. Never returns an empty string.
pub fn sanitize(name: &str) -> String {
    let mut out = NON_IDENTIFIER_CHAR.replace_all(name, "_").into_owned();
    if !out.chars().next().is_some_and(is_letter) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        for ok in ["T", "_", "élan", "x1", "数据", "a٣"] {
            assert!(is_identifier(ok), "{ok:?}");
        }
        for bad in ["", "1x", "A²", "Ⅻ", "x½", "a-b", "a b"] {
            assert!(!is_identifier(bad), "{bad:?}");
        }
    }

    #[test]
    fn digits_are_decimal_only() {
        assert!(is_decimal_digit('7'));
        assert!(is_decimal_digit('٣'));
        assert!(!is_decimal_digit('²'));
        assert!(!is_decimal_digit('½'));
        assert!(!is_letter('Ⅻ'));
    }

    #[test]
    fn sanitized_names_are_identifiers() {
        for (raw, expected) in [
            ("A²", "A_"),
            ("Ⅻ", "_"),
            ("X½", "X_"),
            ("123", "_123"),
            ("A|B", "A_B"),
            ("", "_"),
            ("Élan", "Élan"),
        ] {
            let name = sanitize(raw);
            assert_eq!(name, expected, "raw {raw:?}");
            assert!(is_identifier(&name), "{name:?}");
        }
    }
}
