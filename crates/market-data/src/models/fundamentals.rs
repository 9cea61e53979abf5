use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A financial statement: line item -> (period end date -> value).
///
/// Ordered maps keep the serialized output stable between calls.
pub type Statement = BTreeMap<String, BTreeMap<String, f64>>;

/// Income, balance sheet and cash flow statements for one company.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub quarterly_income: Statement,
    pub yearly_income: Statement,
    pub balance_sheet: Statement,
    pub cash_flow: Statement,
}

impl FinancialStatements {
    pub fn is_empty(&self) -> bool {
        self.quarterly_income.is_empty()
            && self.yearly_income.is_empty()
            && self.balance_sheet.is_empty()
            && self.cash_flow.is_empty()
    }
}

/// Analyst rating counts for one period (e.g. "0m" for the current month).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationTrend {
    pub period: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_statements() {
        let mut statements = FinancialStatements::default();
        assert!(statements.is_empty());

        statements
            .cash_flow
            .entry("freeCashFlow".to_string())
            .or_default()
            .insert("2024-09-30".to_string(), 1.0e9);
        assert!(!statements.is_empty());
    }
}
