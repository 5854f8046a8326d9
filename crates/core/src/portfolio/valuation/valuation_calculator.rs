//! Valuation engine: cost basis, shares, value, profit and premium for one
//! holding from whatever market data is available.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fundboard_market_data::{EstimateSnapshot, NavData, Quote};

use super::{CostSource, Diagnostic, PriceSource, ValuationResult};
use crate::portfolio::holdings::{Holding, HoldingKind, PricingMode};
use crate::portfolio::settlement::{compute_settlement, SettlementBasis};
use crate::utils::time_utils::days_between;

/// Latest published NAV: the series tail, else the estimate's reference NAV.
fn latest_nav(
    nav: Option<&NavData>,
    estimate: Option<&EstimateSnapshot>,
) -> Option<(Decimal, Option<NaiveDate>)> {
    if let Some(data) = nav {
        return Some((data.latest_nav, Some(data.latest_nav_date)));
    }
    estimate.and_then(|e| e.reference_nav.map(|nav| (nav, e.reference_date)))
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator > Decimal::ZERO {
        numerator.checked_div(denominator)
    } else {
        None
    }
}

/// Value one holding.
///
/// Inputs that do not apply to the holding's kind are ignored: an off-exchange
/// fund never looks at a quote, an exchange-traded product never at NAV data.
pub fn evaluate(
    holding: &Holding,
    quote: Option<&Quote>,
    nav: Option<&NavData>,
    estimate: Option<&EstimateSnapshot>,
    today: NaiveDate,
) -> ValuationResult {
    let kind = holding.kind;
    let (nav, estimate) = if kind.has_nav() {
        (nav, estimate)
    } else {
        (None, None)
    };
    let quote = if kind.has_quote() { quote } else { None };

    let mut diagnostics = Vec::new();

    let settlement = compute_settlement(kind, nav.map(|n| &n.series), holding.purchase_date);
    if settlement.basis == SettlementBasis::PurchaseDate {
        diagnostics.push(Diagnostic::SettlementDegraded);
    }
    let accruing = settlement.is_accruing(today);

    let latest = latest_nav(nav, estimate);
    let current_nav = estimate
        .and_then(|e| e.estimated_nav)
        .or(latest.map(|(n, _)| n));
    let market_price = quote.map(|q| q.price);

    // Unit cost
    let declared = match holding.declared_unit_cost {
        Some(cost) if cost > Decimal::ZERO => Some((cost, CostSource::Declared)),
        Some(_) => {
            diagnostics.push(Diagnostic::InvalidDeclaredCost);
            None
        }
        None => None,
    };
    let unit_cost = declared.or_else(|| match kind {
        HoldingKind::ExchangeTraded => market_price.map(|p| (p, CostSource::MarketPrice)),
        HoldingKind::OffExchangeFund | HoldingKind::DualQuotedFund => {
            let at_confirmation = match settlement.basis {
                SettlementBasis::TradingDays => {
                    nav.and_then(|n| n.series.nav_on(settlement.confirmation_date))
                }
                _ => None,
            };
            at_confirmation
                .map(|c| (c, CostSource::ConfirmationNav))
                .or(latest.map(|(n, _)| (n, CostSource::LatestNav)))
        }
    });
    if unit_cost.is_none() {
        diagnostics.push(Diagnostic::UndeterminedCost);
    }

    let share_count = unit_cost.and_then(|(cost, _)| ratio(holding.invested_amount, cost));
    // a positive cost that yields no share count means the division overflowed
    let mut overflowed = unit_cost.is_some() && share_count.is_none();

    // Pricing
    let estimate_price = estimate
        .and_then(|e| e.estimated_nav)
        .map(|n| (n, PriceSource::Estimate));
    let nav_price = estimate_price.or(latest.map(|(n, _)| (n, PriceSource::LatestNav)));
    let market = market_price.map(|p| (p, PriceSource::MarketPrice));
    let price = match kind {
        HoldingKind::OffExchangeFund => nav_price,
        HoldingKind::DualQuotedFund => match holding.effective_pricing_mode() {
            PricingMode::MarketPrice => market.or(nav_price),
            PricingMode::NetAssetValue => nav_price.or(market),
        },
        HoldingKind::ExchangeTraded => market,
    };
    if price.is_none() {
        diagnostics.push(Diagnostic::NoPrice);
    }

    let premium_ratio = match (kind, market_price, current_nav) {
        (HoldingKind::DualQuotedFund, Some(market), Some(nav)) => {
            ratio(market, nav).map(|r| r - Decimal::ONE)
        }
        _ => None,
    };

    let (current_value, profit) = if accruing {
        let value = match (share_count, price) {
            (Some(shares), Some((price, _))) => {
                let value = shares.checked_mul(price);
                overflowed |= value.is_none();
                value
            }
            _ => None,
        };
        let profit = value.and_then(|v| v.checked_sub(holding.invested_amount));
        overflowed |= value.is_some() && profit.is_none();
        if profit.is_none() {
            (None, None)
        } else {
            (value, profit)
        }
    } else {
        diagnostics.push(Diagnostic::NotYetAccruing {
            accrual_start_date: settlement.accrual_start_date,
        });
        (Some(holding.invested_amount), Some(Decimal::ZERO))
    };
    if overflowed {
        diagnostics.push(Diagnostic::Overflow);
    }
    let return_ratio = profit.and_then(|p| ratio(p, holding.invested_amount));

    let name = [
        quote.map(|q| q.name.as_str()),
        estimate.map(|e| e.name.as_str()),
        nav.map(|n| n.name.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|n| !n.is_empty())
    .map(str::to_string)
    .or_else(|| holding.name.clone());

    let nav_date = match estimate {
        Some(e) => e.reference_date.or(latest.and_then(|(_, d)| d)),
        None => latest.and_then(|(_, d)| d),
    };
    let daily_change_pct = match price.map(|(_, source)| source) {
        Some(PriceSource::MarketPrice) => quote.and_then(|q| q.change_pct),
        Some(PriceSource::Estimate) => estimate.and_then(|e| e.estimated_change_pct),
        Some(PriceSource::LatestNav) => nav.and_then(|n| n.latest_daily_change_pct),
        None => None,
    };

    ValuationResult {
        holding_id: holding.id.clone(),
        code: holding.code.clone(),
        kind,
        name,
        purchase_date: holding.purchase_date,
        invested_amount: holding.invested_amount,
        settlement,
        accruing,
        holding_days: days_between(settlement.accrual_start_date, today),
        unit_cost: unit_cost.map(|(c, _)| c),
        unit_cost_source: unit_cost.map(|(_, s)| s),
        share_count,
        price: price.map(|(p, _)| p),
        price_source: price.map(|(_, s)| s),
        current_value,
        profit,
        return_ratio,
        premium_ratio,
        weight: None,
        current_nav,
        nav_date,
        estimate_time: estimate.and_then(|e| e.as_of_time),
        daily_change_pct,
        market_price,
        market_time: quote.and_then(|q| q.time.clone()),
        quote_source: quote.map(|q| q.source_id.clone()),
        diagnostics,
    }
}

/// Result for a holding that failed validation: everything undefined.
pub fn invalid_holding(holding: &Holding, message: String, today: NaiveDate) -> ValuationResult {
    let mut result = evaluate(holding, None, None, None, today);
    result.unit_cost = None;
    result.unit_cost_source = None;
    result.share_count = None;
    result.price = None;
    result.price_source = None;
    result.current_value = None;
    result.profit = None;
    result.return_ratio = None;
    result.diagnostics = vec![Diagnostic::InvalidHolding { message }];
    result
}
