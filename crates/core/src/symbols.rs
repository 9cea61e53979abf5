//! Ticker symbol normalization.

use std::fmt;

use serde::Serialize;

use crate::errors::{Error, Result};

const MAX_SYMBOL_LEN: usize = 20;

/// A trimmed, uppercased ticker symbol.
///
/// Construction is the only validation point; every aggregation operation
/// parses its input through [`Symbol::parse`] before touching the cache or
/// the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_uppercase();
        let valid = !normalized.is_empty()
            && normalized.len() <= MAX_SYMBOL_LEN
            && normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '&'));

        if valid {
            Ok(Self(normalized))
        } else {
            Err(Error::InvalidSymbol(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a comma separated list, dropping blank entries.
pub fn split_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(Symbol::parse("  aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("reliance.ns").unwrap().as_str(), "RELIANCE.NS");
        assert_eq!(Symbol::parse("^gspc").unwrap().as_str(), "^GSPC");
        assert_eq!(Symbol::parse("brk-b").unwrap().as_str(), "BRK-B");
        assert_eq!(Symbol::parse("M&M.NS").unwrap().as_str(), "M&M.NS");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for raw in ["", "   ", "AA PL", "AAPL;DROP", "ABCDEFGHIJKLMNOPQRSTUVWXYZ", "€UR"] {
            assert!(
                matches!(Symbol::parse(raw), Err(Error::InvalidSymbol(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_split_symbol_list() {
        assert_eq!(split_symbol_list("aapl, msft,,goog "), vec!["aapl", "msft", "goog"]);
        assert!(split_symbol_list(" , ").is_empty());
    }
}
