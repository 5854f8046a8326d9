//! Trailing-window return curves, per holding and across the portfolio.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fundboard_market_data::NavSeries;

use super::CurvePoint;
use crate::errors::ValuationError;

/// Trading dates kept in a curve.
pub const CURVE_WINDOW: usize = 7;

/// Fewest points that make a trend.
pub const MIN_CURVE_POINTS: usize = 2;

/// Inputs for one holding's curve.
#[derive(Debug, Clone, Copy)]
pub struct CurveInput<'a> {
    pub series: &'a NavSeries,
    pub purchase_date: NaiveDate,
    pub share_count: Decimal,
    pub invested_amount: Decimal,
    pub accrual_start_date: NaiveDate,
    /// Multiplier applied to each historical NAV; `current market / current
    /// NAV` for dual-quoted holdings priced at market, else one
    pub price_factor: Decimal,
}

/// Build the trailing curve of one holding.
///
/// Uses the trading dates on or after the purchase date, at most the last
/// [`CURVE_WINDOW`] of them. Points before the accrual start are pinned to
/// zero return and zero profit.
pub fn build_curve(input: &CurveInput<'_>) -> Result<Vec<CurvePoint>, ValuationError> {
    let points = input.series.points();
    let from = input
        .series
        .first_index_on_or_after(input.purchase_date)
        .unwrap_or(points.len());
    let eligible = &points[from..];
    let window = &eligible[eligible.len().saturating_sub(CURVE_WINDOW)..];

    if window.len() < MIN_CURVE_POINTS {
        return Err(ValuationError::InsufficientCurveData {
            points: window.len(),
        });
    }

    let base_nav = window[0].net_asset_value;

    window
        .iter()
        .map(|point| -> Result<CurvePoint, ValuationError> {
            if point.date < input.accrual_start_date {
                return Ok(CurvePoint {
                    date: point.date,
                    cumulative_return: Decimal::ZERO,
                    cumulative_profit: Decimal::ZERO,
                });
            }
            let cumulative_return = point
                .net_asset_value
                .checked_div(base_nav)
                .and_then(|r| r.checked_sub(Decimal::ONE))
                .ok_or(ValuationError::Overflow("curve return"))?;
            let cumulative_profit = point
                .net_asset_value
                .checked_mul(input.price_factor)
                .and_then(|price| input.share_count.checked_mul(price))
                .and_then(|value| value.checked_sub(input.invested_amount))
                .ok_or(ValuationError::Overflow("curve profit"))?;
            Ok(CurvePoint {
                date: point.date,
                cumulative_return,
                cumulative_profit,
            })
        })
        .collect()
}

/// One holding's contribution to the portfolio curve.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioCurveInput<'a> {
    pub series: &'a NavSeries,
    pub share_count: Decimal,
    pub accrual_start_date: NaiveDate,
    pub price_factor: Decimal,
}

/// Build the aggregated curve across holdings.
///
/// The window is the last [`CURVE_WINDOW`] dates of the union of every
/// series. On each date a holding contributes `shares x price` at its latest
/// NAV on or before that date, once it is accruing. Return and profit are
/// relative to the first date's total.
pub fn build_portfolio_curve(
    inputs: &[PortfolioCurveInput<'_>],
) -> Result<Vec<CurvePoint>, ValuationError> {
    let all_dates: BTreeSet<NaiveDate> = inputs.iter().flat_map(|i| i.series.dates()).collect();
    let window: Vec<NaiveDate> = all_dates
        .iter()
        .rev()
        .take(CURVE_WINDOW)
        .rev()
        .copied()
        .collect();

    if window.len() < MIN_CURVE_POINTS {
        return Err(ValuationError::InsufficientCurveData {
            points: window.len(),
        });
    }

    let totals = window
        .iter()
        .map(|&date| {
            inputs
                .iter()
                .filter(|i| date >= i.accrual_start_date && i.share_count > Decimal::ZERO)
                .filter_map(|i| i.series.nav_on_or_before(date).map(|nav| (i, nav)))
                .try_fold(Decimal::ZERO, |total, (i, nav)| {
                    i.share_count
                        .checked_mul(nav)
                        .and_then(|v| v.checked_mul(i.price_factor))
                        .and_then(|v| total.checked_add(v))
                })
                .ok_or(ValuationError::Overflow("portfolio curve total"))
        })
        .collect::<Result<Vec<Decimal>, ValuationError>>()?;

    let base = totals[0];
    if base <= Decimal::ZERO {
        return Err(ValuationError::InsufficientCurveData {
            points: totals.iter().filter(|t| **t > Decimal::ZERO).count(),
        });
    }

    window
        .into_iter()
        .zip(totals)
        .map(|(date, total)| -> Result<CurvePoint, ValuationError> {
            Ok(CurvePoint {
                date,
                cumulative_return: total
                    .checked_div(base)
                    .and_then(|r| r.checked_sub(Decimal::ONE))
                    .ok_or(ValuationError::Overflow("portfolio curve return"))?,
                cumulative_profit: total
                    .checked_sub(base)
                    .ok_or(ValuationError::Overflow("portfolio curve profit"))?,
            })
        })
        .collect()
}
