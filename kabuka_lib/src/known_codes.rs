//! Built-in display names for a handful of well-known codes.
//!
//! Used when the quote page yields nothing, so that popular codes still get a
//! real company name and a market-qualified symbol. The table is embedded at
//! compile time from `seed_data/known_codes.yml`.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Error types for known code table operations.
#[derive(Error, Debug)]
pub enum KnownCodesError {
    #[error("Failed to parse known code YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate code in known code file: {0}")]
    DuplicateCode(String),
}

/// Top-level structure for the known code YAML file.
#[derive(Deserialize, Debug)]
pub struct KnownCodesFile {
    pub codes: Vec<KnownCode>,
}

/// One entry: the code as a caller or the upstream spells it, its display
/// name, and the symbol to report.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct KnownCode {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Lookup table keyed by code.
#[derive(Debug, Clone, Default)]
pub struct KnownCodes {
    entries: HashMap<String, KnownCode>,
}

impl KnownCodes {
    pub fn get(&self, code: &str) -> Option<&KnownCode> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse known codes from YAML content. Duplicate codes are rejected.
pub fn parse_known_codes(yaml_content: &str) -> Result<KnownCodes, KnownCodesError> {
    let file: KnownCodesFile = serde_yml::from_str(yaml_content)?;

    let mut entries = HashMap::new();
    for entry in file.codes {
        if entries.contains_key(&entry.code) {
            return Err(KnownCodesError::DuplicateCode(entry.code));
        }
        entries.insert(entry.code.clone(), entry);
    }

    Ok(KnownCodes { entries })
}

/// Load the known code table embedded at compile time.
pub fn load_known_codes() -> Result<KnownCodes, KnownCodesError> {
    let yaml_content = include_str!("../../seed_data/known_codes.yml");
    parse_known_codes(yaml_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        let yaml = r#"
codes:
  - code: "7203"
    name: "トヨタ自動車"
    symbol: "7203.T"
  - code: "7974"
    name: "任天堂"
    symbol: "7974.T"
"#;
        let table = parse_known_codes(yaml).unwrap();
        assert_eq!(table.len(), 2);
        let toyota = table.get("7203").unwrap();
        assert_eq!(toyota.name, "トヨタ自動車");
        assert_eq!(toyota.symbol, "7203.T");
        assert!(table.get("9999").is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let yaml = r#"
codes:
  - code: "7203"
    name: "トヨタ自動車"
    symbol: "7203.T"
  - code: "7203"
    name: "Toyota"
    symbol: "TM"
"#;
        let result = parse_known_codes(yaml);
        assert!(matches!(result.unwrap_err(), KnownCodesError::DuplicateCode(c) if c == "7203"));
    }

    #[test]
    fn test_missing_field_rejected() {
        let yaml = r#"
codes:
  - code: "7203"
    name: "トヨタ自動車"
"#;
        assert!(matches!(
            parse_known_codes(yaml).unwrap_err(),
            KnownCodesError::YamlParse(_)
        ));
    }

    #[test]
    fn test_empty_codes() {
        let table = parse_known_codes("codes: []\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_embedded_table_covers_index_under_both_spellings() {
        let table = load_known_codes().unwrap();
        let alias = table.get("^N225").unwrap();
        let internal = table.get("0000").unwrap();
        assert_eq!(alias.name, internal.name);
        assert_eq!(alias.symbol, "^N225");
        assert_eq!(internal.symbol, "^N225");
    }

    #[test]
    fn test_embedded_table_has_toyota() {
        let table = load_known_codes().unwrap();
        let toyota = table.get("7203").unwrap();
        assert_eq!(toyota.name, "トヨタ自動車");
        assert_eq!(toyota.symbol, "7203.T");
    }
}
