use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Estimate as parsed from the provider payload, before validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEstimate {
    pub code: String,
    pub name: String,
    pub estimated_nav: Option<f64>,
    /// Estimated change in percent units (0.52 = 0.52%)
    pub estimated_change_pct: Option<f64>,
    pub as_of_time: Option<String>,
    pub reference_date: Option<String>,
    pub reference_nav: Option<f64>,
}

/// Live intraday valuation estimate for a fund.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSnapshot {
    pub code: String,
    pub name: String,
    /// Estimated NAV, > 0 when present; absent outside estimation hours
    /// for some funds, leaving only the reference NAV
    pub estimated_nav: Option<Decimal>,
    /// Estimated day change as a fraction
    pub estimated_change_pct: Option<Decimal>,
    pub as_of_time: Option<NaiveDateTime>,
    /// Date of the last published NAV the estimate is based on
    pub reference_date: Option<NaiveDate>,
    /// Last published NAV
    pub reference_nav: Option<Decimal>,
}
