//! Per-holding valuation models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundboard_market_data::DataKind;

use crate::portfolio::holdings::HoldingKind;
use crate::portfolio::settlement::SettlementInfo;

/// Where the unit cost came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostSource {
    Declared,
    ConfirmationNav,
    LatestNav,
    MarketPrice,
}

/// Which price the current value was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    Estimate,
    LatestNav,
    MarketPrice,
}

/// Non-fatal per-holding condition, carried on the result instead of failing
/// the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Diagnostic {
    /// The holding itself is unusable.
    InvalidHolding { message: String },
    /// A non-positive declared unit cost was ignored.
    InvalidDeclaredCost,
    /// NAV history could not be loaded.
    SeriesUnavailable { reason: String },
    /// No quote source produced a valid quote.
    QuoteUnavailable { reason: String },
    /// Unit cost neither declared nor inferable.
    UndeterminedCost,
    /// No price to value the holding at.
    NoPrice,
    /// Settlement fell back to the purchase date.
    SettlementDegraded,
    /// Purchase is not yet accruing; value pinned to the invested amount.
    NotYetAccruing { accrual_start_date: NaiveDate },
    /// A source failed and an expired cached value was used.
    StaleData { kind: DataKind },
    /// Arithmetic on this holding's amounts left the decimal range.
    Overflow,
}

impl Diagnostic {
    /// Whether the condition leaves value or profit undefined.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Diagnostic::InvalidHolding { .. }
                | Diagnostic::UndeterminedCost
                | Diagnostic::NoPrice
                | Diagnostic::Overflow
        )
    }
}

/// Derived valuation of one holding.
///
/// `None` means "not computable"; it is never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub holding_id: String,
    pub code: String,
    pub kind: HoldingKind,
    pub name: Option<String>,
    pub purchase_date: NaiveDate,
    pub invested_amount: Decimal,

    pub settlement: SettlementInfo,
    pub accruing: bool,
    /// Calendar days since accrual started, floored at zero
    pub holding_days: i64,

    pub unit_cost: Option<Decimal>,
    pub unit_cost_source: Option<CostSource>,
    pub share_count: Option<Decimal>,

    /// Price the value was computed from
    pub price: Option<Decimal>,
    pub price_source: Option<PriceSource>,
    pub current_value: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub return_ratio: Option<Decimal>,
    /// `marketPrice / currentNav - 1`, dual-quoted only
    pub premium_ratio: Option<Decimal>,
    /// Share of total portfolio value, set by the aggregator
    pub weight: Option<Decimal>,

    /// Estimate if present, else latest NAV
    pub current_nav: Option<Decimal>,
    pub nav_date: Option<NaiveDate>,
    pub estimate_time: Option<NaiveDateTime>,
    pub daily_change_pct: Option<Decimal>,
    pub market_price: Option<Decimal>,
    pub market_time: Option<String>,
    pub quote_source: Option<String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl ValuationResult {
    /// Whether value and profit are both defined.
    pub fn is_valued(&self) -> bool {
        self.current_value.is_some() && self.profit.is_some()
    }

    pub fn has_diagnostic(&self, predicate: impl Fn(&Diagnostic) -> bool) -> bool {
        self.diagnostics.iter().any(predicate)
    }
}
