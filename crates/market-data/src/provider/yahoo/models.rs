//! Yahoo Finance API response models.
//!
//! These models parse the quoteSummary API, which carries the profile,
//! key statistics, statements and analyst trends that the chart API lacks.

use std::collections::HashMap;

use serde::Deserialize;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container. Yahoo sends `result: null` together with an
/// `error` object for unknown tickers.
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_profile: Option<YahooSummaryProfile>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
    pub financial_data: Option<YahooFinancialData>,
    pub income_statement_history: Option<YahooIncomeHistory>,
    pub income_statement_history_quarterly: Option<YahooIncomeHistory>,
    pub balance_sheet_history: Option<YahooBalanceSheetHistory>,
    pub cashflow_statement_history: Option<YahooCashflowHistory>,
    pub recommendation_trend: Option<YahooRecommendationTrend>,
}

/// Price data from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub market_cap: Option<YahooValue>,
    pub regular_market_volume: Option<YahooValue>,
    pub regular_market_day_high: Option<YahooValue>,
    pub regular_market_day_low: Option<YahooValue>,
}

/// Numeric value with raw and formatted renderings.
/// Yahoo sends `{}` when a metric is unavailable.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct YahooValue {
    pub raw: Option<f64>,
}

/// Date with epoch seconds and a preformatted `YYYY-MM-DD` string.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct YahooDate {
    pub raw: Option<i64>,
    pub fmt: Option<String>,
}

/// Summary profile data (company info)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
    pub country: Option<String>,
    pub full_time_employees: Option<u64>,
}

/// Summary detail data (trading statistics)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub market_cap: Option<YahooValue>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooValue>,
    pub dividend_yield: Option<YahooValue>,
    pub beta: Option<YahooValue>,
    pub volume: Option<YahooValue>,
    pub day_high: Option<YahooValue>,
    pub day_low: Option<YahooValue>,
    pub fifty_two_week_high: Option<YahooValue>,
    pub fifty_two_week_low: Option<YahooValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub beta: Option<YahooValue>,
    pub book_value: Option<YahooValue>,
    pub price_to_book: Option<YahooValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFinancialData {
    pub total_revenue: Option<YahooValue>,
    pub profit_margins: Option<YahooValue>,
    pub quick_ratio: Option<YahooValue>,
    pub debt_to_equity: Option<YahooValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooIncomeHistory {
    #[serde(default)]
    pub income_statement_history: Vec<YahooStatementEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooBalanceSheetHistory {
    #[serde(default)]
    pub balance_sheet_statements: Vec<YahooStatementEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooCashflowHistory {
    #[serde(default)]
    pub cashflow_statements: Vec<YahooStatementEntry>,
}

/// One statement period. Line items are open-ended, so they are kept as raw
/// JSON and filtered down to `{raw: number}` entries when flattened.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooStatementEntry {
    pub end_date: Option<YahooDate>,
    #[serde(flatten)]
    pub items: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct YahooRecommendationTrend {
    #[serde(default)]
    pub trend: Vec<YahooTrend>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooTrend {
    pub period: String,
    #[serde(default)]
    pub strong_buy: u32,
    #[serde(default)]
    pub buy: u32,
    #[serde(default)]
    pub hold: u32,
    #[serde(default)]
    pub sell: u32,
    #[serde(default)]
    pub strong_sell: u32,
}

pub(crate) fn raw(value: &Option<YahooValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_value() {
        let value: YahooValue = serde_json::from_str(r#"{"raw": 150.25, "fmt": "150.25"}"#).unwrap();
        assert_eq!(value.raw, Some(150.25));

        let empty: YahooValue = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.raw, None);
    }

    #[test]
    fn test_deserialize_not_found_response() {
        let json = r#"{
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol: ZZZZ"}
            }
        }"#;
        let response: YahooQuoteSummaryResponse = serde_json::from_str(json).unwrap();
        assert!(response.quote_summary.result.is_none());
        assert_eq!(
            response.quote_summary.error.and_then(|e| e.code),
            Some("Not Found".to_string())
        );
    }

    #[test]
    fn test_deserialize_summary_detail() {
        let json = r#"{
            "marketCap": {"raw": 2800000000000, "fmt": "2.8T"},
            "trailingPE": {"raw": 28.5, "fmt": "28.50"},
            "dividendYield": {},
            "beta": {"raw": 1.24},
            "fiftyTwoWeekHigh": {"raw": 199.62, "fmt": "199.62"}
        }"#;
        let detail: YahooSummaryDetail = serde_json::from_str(json).unwrap();
        assert_eq!(raw(&detail.market_cap), Some(2800000000000.0));
        assert_eq!(raw(&detail.trailing_pe), Some(28.5));
        assert_eq!(raw(&detail.dividend_yield), None);
        assert_eq!(raw(&detail.beta), Some(1.24));
        assert_eq!(raw(&detail.fifty_two_week_low), None);
    }

    #[test]
    fn test_deserialize_statement_entry() {
        let json = r#"{
            "maxAge": 1,
            "endDate": {"raw": 1727654400, "fmt": "2024-09-30"},
            "totalRevenue": {"raw": 391035000000, "fmt": "391.04B"},
            "netIncome": {"raw": 93736000000, "fmt": "93.74B"},
            "researchDevelopment": {}
        }"#;
        let entry: YahooStatementEntry = serde_json::from_str(json).unwrap();
        assert_eq!(
            entry.end_date.and_then(|d| d.fmt),
            Some("2024-09-30".to_string())
        );
        assert!(entry.items.contains_key("totalRevenue"));
        assert!(entry.items.contains_key("maxAge"));
    }

    #[test]
    fn test_deserialize_recommendation_trend() {
        let json = r#"{
            "trend": [
                {"period": "0m", "strongBuy": 8, "buy": 24, "hold": 12, "sell": 1, "strongSell": 2},
                {"period": "-1m", "strongBuy": 7, "buy": 23}
            ]
        }"#;
        let trend: YahooRecommendationTrend = serde_json::from_str(json).unwrap();
        assert_eq!(trend.trend.len(), 2);
        assert_eq!(trend.trend[0].strong_sell, 2);
        assert_eq!(trend.trend[1].hold, 0);
    }
}
