use log::warn;
use rust_decimal::Decimal;

use super::PortfolioTotals;
use crate::portfolio::valuation::ValuationResult;

/// Sum per-holding results into portfolio totals.
///
/// A holding with undefined value or profit still counts toward the invested
/// total but adds nothing to value or profit; its id is listed in
/// `excluded_holding_ids`. A holding whose amounts would push a total out of
/// the decimal range is left out of that total the same way.
pub fn aggregate(results: &[ValuationResult]) -> PortfolioTotals {
    let mut totals = PortfolioTotals {
        total_invested: Decimal::ZERO,
        total_value: Decimal::ZERO,
        total_profit: Decimal::ZERO,
        return_ratio: None,
        valued_count: 0,
        excluded_holding_ids: Vec::new(),
    };

    for result in results {
        let Some(invested) = totals.total_invested.checked_add(result.invested_amount) else {
            warn!(
                "Invested total overflowed at holding {}, leaving it out",
                result.holding_id
            );
            totals.excluded_holding_ids.push(result.holding_id.clone());
            continue;
        };
        totals.total_invested = invested;

        let sums = match (result.current_value, result.profit) {
            (Some(value), Some(profit)) => {
                let sums = totals
                    .total_value
                    .checked_add(value)
                    .zip(totals.total_profit.checked_add(profit));
                if sums.is_none() {
                    warn!(
                        "Value total overflowed at holding {}, leaving it out",
                        result.holding_id
                    );
                }
                sums
            }
            _ => None,
        };
        match sums {
            Some((value, profit)) => {
                totals.total_value = value;
                totals.total_profit = profit;
                totals.valued_count += 1;
            }
            None => totals.excluded_holding_ids.push(result.holding_id.clone()),
        }
    }

    if totals.total_invested > Decimal::ZERO {
        totals.return_ratio = totals.total_profit.checked_div(totals.total_invested);
    }
    totals
}

/// Set each valued holding's share of the total portfolio value.
///
/// Holdings left out of the totals get no weight.
pub fn apply_weights(results: &mut [ValuationResult], totals: &PortfolioTotals) {
    for result in results.iter_mut() {
        let excluded = totals.excluded_holding_ids.contains(&result.holding_id);
        result.weight = match result.current_value {
            Some(value) if !excluded && totals.total_value > Decimal::ZERO => {
                value.checked_div(totals.total_value)
            }
            _ => None,
        };
    }
}
