//! Company name to ticker reference list.
//!
//! Loaded once at startup from an index constituents CSV (the NSE publishes
//! these with `Company Name` and `Symbol` columns among others). Tickers are
//! stored with the exchange suffix the quote source expects.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::REFERENCE_TICKER_SUFFIX;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub company: String,
    pub ticker: String,
}

#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    #[serde(rename = "Company Name")]
    company: String,
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Read-only lookup table, shared by reference after startup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }

    /// Parse CSV content. Extra columns are ignored; rows with a blank
    /// symbol are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in csv.deserialize::<ReferenceRecord>() {
            let record = record.map_err(|e| Error::Reference(e.to_string()))?;
            if record.symbol.is_empty() {
                continue;
            }
            entries.push(ReferenceEntry {
                company: record.company,
                ticker: format!("{}{}", record.symbol, REFERENCE_TICKER_SUFFIX),
            });
        }

        Ok(Self { entries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Reference(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(file)
    }

    /// Load from an `http(s)://` URL or a local path.
    pub async fn load(location: &str) -> Result<Self> {
        let table = if location.starts_with("http://") || location.starts_with("https://") {
            let body = reqwest::get(location)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| Error::Reference(e.to_string()))?
                .bytes()
                .await
                .map_err(|e| Error::Reference(e.to_string()))?;
            Self::from_reader(body.as_ref())?
        } else {
            Self::from_path(location)?
        };
        info!("Loaded {} reference entries from {}", table.len(), location);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact ticker match first, then the first company whose name contains
    /// the query. Both comparisons ignore case.
    pub fn find_ticker(&self, query: &str) -> Option<&ReferenceEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.ticker.to_lowercase() == query)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.company.to_lowercase().contains(&query))
            })
    }
}
