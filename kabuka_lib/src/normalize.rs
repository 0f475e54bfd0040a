//! Text-to-number normalization for scraped quote fields.
//!
//! Two layers: the `Option` returning functions (`price_value`, `volume_value`)
//! keep "nothing parseable" distinct from a real zero and are what the
//! extractor uses. `parse_price` and `parse_volume` collapse that to `0` at
//! the boundary.

use std::sync::OnceLock;

use regex::Regex;

/// Parse a price-like string, returning `0.0` when nothing numeric is found.
pub fn parse_price(text: &str) -> f64 {
    price_value(text).unwrap_or(0.0)
}

/// Parse a volume string, returning `0` when it holds no digits.
pub fn parse_volume(text: &str) -> u64 {
    volume_value(text).unwrap_or(0)
}

/// Parse a price, change amount or change percent.
///
/// Everything except ASCII digits, `.`, `-` and `+` is removed (currency
/// glyphs, thousands separators, whitespace, `%`). A leading `+` is dropped
/// and the longest leading `[-]digits[.digits]` run is read.
///
/// Returns `None` if no digits survive or the value is not finite.
pub fn price_value(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    leading_number(cleaned)
        .and_then(|n| n.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse a volume: every non-digit is removed, the rest is read as an integer.
pub fn volume_value(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Longest numeric prefix of an already-cleaned string.
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut j = end + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - end - 1;
        if frac_digits > 0 {
            end = j;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    Some(&s[..end])
}

fn code_prefix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[0-9]+\s*(\D.*)$")
                .map_err(|e| tracing::error!("Invalid code prefix pattern: {}", e))
                .ok()
        })
        .as_ref()
}

/// Strip a leading security code from a heading like `2269　明治ホールディングス`.
///
/// The name must start with a non-digit, so a bare code such as `7203` has
/// no name to strip down to and is returned as is. Text without a numeric
/// prefix is returned trimmed but otherwise unchanged.
pub fn strip_code_prefix(text: &str) -> String {
    let trimmed = text.trim();
    code_prefix_pattern()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
