//! Confirmation and accrual dates from the trading-day sequence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fundboard_market_data::NavSeries;

use crate::portfolio::holdings::HoldingKind;

/// Where the settlement dates came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SettlementBasis {
    /// Both dates are trading dates of the NAV series.
    TradingDays,
    /// Exchange-traded: settles on the purchase date.
    SameDay,
    /// No series available; both dates fall back to the purchase date.
    PurchaseDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInfo {
    pub confirmation_date: NaiveDate,
    pub accrual_start_date: NaiveDate,
    pub basis: SettlementBasis,
}

impl SettlementInfo {
    fn on(date: NaiveDate, basis: SettlementBasis) -> Self {
        Self {
            confirmation_date: date,
            accrual_start_date: date,
            basis,
        }
    }

    /// Whether the position earns return on `today`.
    pub fn is_accruing(&self, today: NaiveDate) -> bool {
        today >= self.accrual_start_date
    }
}

/// Compute settlement for a purchase.
///
/// Confirmation is the first trading date on or after the purchase date, or
/// the last available date when the purchase is newer than the series.
/// Accrual starts on the next trading date, or on the confirmation date when
/// there is no next date yet.
pub fn compute_settlement(
    kind: HoldingKind,
    series: Option<&NavSeries>,
    purchase_date: NaiveDate,
) -> SettlementInfo {
    if kind == HoldingKind::ExchangeTraded {
        return SettlementInfo::on(purchase_date, SettlementBasis::SameDay);
    }

    let series = match series.filter(|s| !s.is_empty()) {
        Some(series) => series,
        None => return SettlementInfo::on(purchase_date, SettlementBasis::PurchaseDate),
    };

    let confirm_index = series
        .first_index_on_or_after(purchase_date)
        .unwrap_or(series.len() - 1);

    let confirmation = series.get(confirm_index).map(|p| p.date);
    let accrual = series
        .get(confirm_index + 1)
        .or_else(|| series.get(confirm_index))
        .map(|p| p.date);

    match (confirmation, accrual) {
        (Some(confirmation_date), Some(accrual_start_date)) => SettlementInfo {
            confirmation_date,
            accrual_start_date,
            basis: SettlementBasis::TradingDays,
        },
        _ => SettlementInfo::on(purchase_date, SettlementBasis::PurchaseDate),
    }
}
