use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio totals over one valuation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    /// Invested amount of every holding, valued or not
    pub total_invested: Decimal,
    /// Sum over valued holdings only
    pub total_value: Decimal,
    /// Sum over valued holdings only
    pub total_profit: Decimal,
    /// `total_profit / total_invested`
    pub return_ratio: Option<Decimal>,
    pub valued_count: usize,
    /// Holdings left out of the value and profit sums
    pub excluded_holding_ids: Vec<String>,
}
