use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One point of a trailing return curve, relative to the window's first point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub date: NaiveDate,
    pub cumulative_return: Decimal,
    pub cumulative_profit: Decimal,
}
