//! Decimal formatting helpers used when serializing coordinates.
//!
//! These keep path data short: they strip redundant zeros, hide
//! floating-point noise such as `0.30000000000000004`, and format relative
//! offsets with no more digits than the absolute values they came from.

use std::sync::LazyLock;

use regex::Regex;

static ROUNDING_UP_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-]?\d*\.\d{3,})0{4,}\d{1,4}$").unwrap_or_else(|_| unreachable!())
});

static ROUNDING_DOWN_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-]?)(\d*)\.(\d{3,}9{4,})\d{1,4}$").unwrap_or_else(|_| unreachable!())
});

static DECIMAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-]?)(\d*)[.](\d+)$").unwrap_or_else(|_| unreachable!())
});

static TINY_EXPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[eE][-]\d{2,}$").unwrap_or_else(|_| unreachable!()));

/// Shortest round-trip decimal text for `num`, with `-0` written as `0`.
fn plain_string(num: f64) -> String {
    if num == 0.0 {
        "0".to_owned()
    } else {
        num.to_string()
    }
}

/// Removes redundant characters from a decimal number.
///
/// Drops trailing zeros after the decimal point, a trailing `.`, and a
/// leading `0` before the point (`0.50` becomes `.5`, `-0.0` becomes `0`).
/// Text with a large negative exponent rounds to `0`.
#[must_use]
pub fn clean_up_number(text: &str) -> String {
    let has_exponent = text.contains(['e', 'E']);
    if has_exponent && TINY_EXPONENT.is_match(text) {
        return "0".to_owned();
    }

    let mut text = text.to_owned();
    if !has_exponent && text.contains('.') && (text.ends_with('0') || text.ends_with('.')) {
        text = text.trim_end_matches('0').trim_end_matches('.').to_owned();
    }

    if text.starts_with('0') || text.starts_with('-') {
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let without_zeros = digits.trim_start_matches('0');
        text = if without_zeros.is_empty() {
            format!("{sign}0")
        } else if without_zeros.starts_with('.') {
            format!("{sign}{without_zeros}")
        } else {
            text.clone()
        };
    }

    if text == "-0" || text.is_empty() {
        return "0".to_owned();
    }
    text
}

/// Formats `num`, hiding trailing floating-point noise.
///
/// A long run of zeros (or nines) followed by a few stray digits is treated
/// as a rounding artifact and rounded away.
#[must_use]
pub fn to_rounded_string(num: f64) -> String {
    let mut text = plain_string(num);
    if !text.contains('.') {
        return text;
    }

    if let Some(captures) = ROUNDING_DOWN_NOISE.captures(&text) {
        let kept_digits = captures[3].len();
        text = format!("{num:.kept_digits$}");
    }

    let text = ROUNDING_UP_NOISE.replace(&text, "$1");
    clean_up_number(&text)
}

/// Number of digits after the decimal point in `text`.
///
/// `Some(0)` for integers; `None` for exponential notation and non-numbers
/// such as `NaN` or `inf`.
#[must_use]
pub fn get_len_after_decimal(text: &str) -> Option<usize> {
    if let Some(captures) = DECIMAL_NUMBER.captures(text) {
        return Some(captures[3].len());
    }
    if text.contains(['e', 'E']) || text.chars().all(char::is_alphabetic) {
        return None;
    }
    Some(0)
}

/// Formats `num` with as many decimal places as the most precise of
/// `references`.
///
/// Used for relative coordinates so that `prev + delta` re-parses to the
/// same value the absolute form would have produced.
#[must_use]
pub fn to_string_of_same_precision(num: f64, references: &[&str]) -> String {
    let text = plain_string(num);
    if !DECIMAL_NUMBER.is_match(&text) {
        return text;
    }

    let decimal_places = references
        .iter()
        .filter_map(|reference| get_len_after_decimal(reference))
        .max();
    match decimal_places {
        Some(places) => clean_up_number(&format!("{num:.places$}")),
        None => to_rounded_string(num),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_up_trailing_and_leading_zeros() {
        assert_eq!(clean_up_number("1.500"), "1.5");
        assert_eq!(clean_up_number("0.50"), ".5");
        assert_eq!(clean_up_number("-0.25"), "-.25");
        assert_eq!(clean_up_number("100"), "100");
        assert_eq!(clean_up_number("2.0"), "2");
        assert_eq!(clean_up_number("-0.0"), "0");
        assert_eq!(clean_up_number("000"), "0");
        assert_eq!(clean_up_number("1e-20"), "0");
        assert_eq!(clean_up_number("1.5e10"), "1.5e10");
    }

    #[test]
    fn rounded_string_hides_noise() {
        assert_eq!(to_rounded_string(0.1 + 0.2), ".3");
        assert_eq!(to_rounded_string(0.199_999_999_999_999_98), ".2");
        assert_eq!(to_rounded_string(1.0), "1");
        assert_eq!(to_rounded_string(-0.0), "0");
        assert_eq!(to_rounded_string(-12.5), "-12.5");
        assert_eq!(to_rounded_string(1234.5678), "1234.5678");
    }

    #[test]
    fn len_after_decimal() {
        assert_eq!(get_len_after_decimal("1.234"), Some(3));
        assert_eq!(get_len_after_decimal("-.5"), Some(1));
        assert_eq!(get_len_after_decimal("12"), Some(0));
        assert_eq!(get_len_after_decimal("1e5"), None);
        assert_eq!(get_len_after_decimal("NaN"), None);
    }

    #[test]
    fn same_precision_as_references() {
        assert_eq!(to_string_of_same_precision(0.123_456, &["1.23", "2.1"]), ".12");
        assert_eq!(to_string_of_same_precision(1.0 - 0.9, &["1", "0.9"]), ".1");
        assert_eq!(to_string_of_same_precision(5.0, &["1.25"]), "5");
        assert_eq!(to_string_of_same_precision(-0.5004, &["3.001"]), "-.5");
    }
}
