use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use fundboard_core::{CurvePoint, PortfolioTotals, ValuationResult};

/// JSON document printed after each pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub valuation_date: NaiveDate,
    pub results: Vec<ValuationResult>,
    pub totals: PortfolioTotals,
    /// Per-holding curves, only for holdings with enough history
    pub curves: BTreeMap<String, Vec<CurvePoint>>,
    pub portfolio_curve: Option<Vec<CurvePoint>>,
}
