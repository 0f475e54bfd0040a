//! Security code normalization.

use std::fmt;

/// Public alias for the Nikkei 225 benchmark, and the default when no code is given.
pub const INDEX_ALIAS: &str = "^N225";
/// Code the upstream uses for the Nikkei 225 page.
pub const INDEX_CODE: &str = "0000";

const MARKET_SUFFIXES: &[&str] = &[".T", ".JP"];

/// A normalized security code, ready to be sent upstream.
///
/// Built once per request with [`SecurityCode::normalize`] and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityCode(String);

impl SecurityCode {
    /// Normalize caller input.
    ///
    /// - empty input means the benchmark index
    /// - a trailing `.T` / `.JP` market suffix is removed (any case)
    /// - `^N225` becomes [`INDEX_CODE`]
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = if raw.is_empty() { INDEX_ALIAS } else { raw };
        let stripped = strip_market_suffix(raw);
        let code = if stripped.is_empty() || stripped == INDEX_ALIAS {
            INDEX_CODE
        } else {
            stripped
        };
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the benchmark index, whichever alias it arrived as.
    pub fn is_index(&self) -> bool {
        self.0 == INDEX_CODE
    }
}

impl fmt::Display for SecurityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SecurityCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn strip_market_suffix(code: &str) -> &str {
    for suffix in MARKET_SUFFIXES {
        let Some(start) = code.len().checked_sub(suffix.len()) else {
            continue;
        };
        // `get` rather than slicing: the code may contain multi-byte characters.
        if let (Some(head), Some(tail)) = (code.get(..start), code.get(start..)) {
            if tail.eq_ignore_ascii_case(suffix) {
                return head;
            }
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tokyo_suffix() {
        assert_eq!(SecurityCode::normalize("7203.T").as_str(), "7203");
        assert_eq!(SecurityCode::normalize("7203.t").as_str(), "7203");
    }

    #[test]
    fn test_strips_jp_suffix() {
        assert_eq!(SecurityCode::normalize("6758.JP").as_str(), "6758");
        assert_eq!(SecurityCode::normalize("6758.jp").as_str(), "6758");
    }

    #[test]
    fn test_plain_code_unchanged() {
        assert_eq!(SecurityCode::normalize("9984").as_str(), "9984");
        assert_eq!(SecurityCode::normalize(" 9984 ").as_str(), "9984");
    }

    #[test]
    fn test_other_suffix_kept() {
        assert_eq!(SecurityCode::normalize("AAPL.US").as_str(), "AAPL.US");
        assert_eq!(SecurityCode::normalize("7203.TO").as_str(), "7203.TO");
    }

    #[test]
    fn test_index_alias_maps_to_internal_code() {
        let code = SecurityCode::normalize("^N225");
        assert_eq!(code.as_str(), INDEX_CODE);
        assert!(code.is_index());
    }

    #[test]
    fn test_empty_defaults_to_index() {
        assert_eq!(SecurityCode::normalize("").as_str(), INDEX_CODE);
        assert_eq!(SecurityCode::normalize("   ").as_str(), INDEX_CODE);
        assert_eq!(SecurityCode::normalize(".T").as_str(), INDEX_CODE);
    }

    #[test]
    fn test_normalization_idempotent_for_aliases() {
        for raw in [INDEX_ALIAS, INDEX_CODE, "7203.T", "7203", "6758.JP", ""] {
            let once = SecurityCode::normalize(raw);
            let twice = SecurityCode::normalize(once.as_str());
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_multibyte_code_does_not_panic() {
        assert_eq!(SecurityCode::normalize("株").as_str(), "株");
        assert_eq!(SecurityCode::normalize("日経.T").as_str(), "日経");
    }

    #[test]
    fn test_display_matches_as_str() {
        let code = SecurityCode::normalize("7974.T");
        assert_eq!(code.to_string(), "7974");
        assert_eq!(code.as_ref(), "7974");
    }
}
