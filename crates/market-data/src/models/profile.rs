use serde::{Deserialize, Serialize};

/// Company profile and key statistics as reported by a quote source.
///
/// Every field is optional: providers routinely omit metrics for ETFs,
/// indices and thinly covered listings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    /// Provider that supplied this profile (e.g., "YAHOO")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Full registered name (e.g., "Apple Inc.")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,

    /// Abbreviated display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    /// Business sector (e.g., "Technology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Industry within sector (e.g., "Consumer Electronics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Country of domicile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Company website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Long business description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of full-time employees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_high: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_low: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<f64>,

    /// Trailing price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,

    /// Dividend yield (as decimal, e.g., 0.025 for 2.5%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    /// Trailing twelve month revenue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_book: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_ratio: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<f64>,
}

impl AssetProfile {
    /// Create a profile with a long name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            long_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the sector
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set the market capitalization
    pub fn market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Long name if present, otherwise the short name.
    pub fn display_name(&self) -> Option<&str> {
        self.long_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.short_name.as_deref().filter(|n| !n.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_profile_builder() {
        let profile = AssetProfile::with_name("Apple Inc.")
            .sector("Technology")
            .market_cap(3.0e12);

        assert_eq!(profile.long_name, Some("Apple Inc.".to_string()));
        assert_eq!(profile.sector, Some("Technology".to_string()));
        assert_eq!(profile.market_cap, Some(3.0e12));
    }

    #[test]
    fn test_display_name_falls_back_to_short_name() {
        let profile = AssetProfile {
            short_name: Some("Apple".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), Some("Apple"));

        let profile = AssetProfile {
            long_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), None);
    }

    #[test]
    fn test_asset_profile_serialization() {
        let profile = AssetProfile {
            long_name: Some("Test Company".to_string()),
            sector: Some("Technology".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Test Company"));
        assert!(json.contains("Technology"));
        assert!(!json.contains("website"));
    }
}
