//! Property-based tests for settlement, valuation and curve building.
//!
//! Series, purchase dates and prices are generated at random; the properties
//! below must hold for every combination.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use fundboard_core::portfolio::performance::{build_curve, CurveInput, CURVE_WINDOW};
use fundboard_core::portfolio::settlement::compute_settlement;
use fundboard_core::portfolio::valuation::{evaluate, CostSource};
use fundboard_core::{Holding, HoldingKind};
use fundboard_market_data::{NavData, NavPoint, NavSeries, Quote, Venue};

// =============================================================================
// Generators
// =============================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: u32) -> NaiveDate {
    base_date() + Duration::days(offset as i64)
}

/// NAV in 0.0001 steps between 0.5 and 5.
fn arb_nav() -> impl Strategy<Value = Decimal> {
    (5_000i64..50_000).prop_map(|units| Decimal::new(units, 4))
}

/// Unordered points with possible duplicate dates.
fn arb_raw_points() -> impl Strategy<Value = Vec<(u32, Decimal)>> {
    proptest::collection::vec((0u32..60, arb_nav()), 1..40)
}

fn arb_kind() -> impl Strategy<Value = HoldingKind> {
    prop_oneof![
        Just(HoldingKind::OffExchangeFund),
        Just(HoldingKind::DualQuotedFund),
        Just(HoldingKind::ExchangeTraded),
    ]
}

fn series_from(points: &[(u32, Decimal)]) -> NavSeries {
    NavSeries::from_points(points.iter().map(|&(offset, nav)| NavPoint {
        date: day(offset),
        net_asset_value: nav,
    }))
}

fn nav_data(series: NavSeries) -> NavData {
    let last = *series.last().unwrap();
    NavData {
        code: "000001".to_string(),
        name: "Generated".to_string(),
        series,
        latest_nav: last.net_asset_value,
        latest_nav_date: last.date,
        latest_daily_change_pct: None,
    }
}

fn quote(price: Decimal) -> Quote {
    Quote {
        source_id: "SINA".to_string(),
        code: "000001".to_string(),
        venue: Venue::Shenzhen,
        name: "Generated".to_string(),
        price,
        change_pct: None,
        time: None,
    }
}

fn holding(kind: HoldingKind, purchase: u32, invested: Decimal) -> Holding {
    Holding {
        id: "p1".to_string(),
        code: "000001".to_string(),
        kind,
        purchase_date: day(purchase),
        invested_amount: invested,
        declared_unit_cost: None,
        pricing_mode: None,
        name: None,
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A series is strictly ascending by date whatever order points arrive in.
    #[test]
    fn prop_series_is_strictly_ascending(points in arb_raw_points()) {
        let series = series_from(&points);
        let dates: Vec<NaiveDate> = series.dates().collect();
        prop_assert!(!dates.is_empty());
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    /// Duplicate dates keep the last value written.
    #[test]
    fn prop_series_last_write_wins(points in arb_raw_points()) {
        let series = series_from(&points);
        for &(offset, _) in &points {
            let expected = points.iter().rev().find(|(o, _)| *o == offset).map(|(_, n)| *n);
            prop_assert_eq!(series.nav_on(day(offset)), expected);
        }
    }

    /// Before accrual starts, value is the invested amount and profit is zero
    /// regardless of the prices fed in.
    #[test]
    fn prop_gated_holdings_hold_invested_amount(
        points in arb_raw_points(),
        kind in arb_kind(),
        purchase in 0u32..70,
        invested in 1i64..1_000_000,
        price in arb_nav(),
    ) {
        let invested = Decimal::new(invested, 2);
        let data = nav_data(series_from(&points));
        let h = holding(kind, purchase, invested);
        let settlement = compute_settlement(kind, Some(&data.series), h.purchase_date);
        let today = settlement.accrual_start_date - Duration::days(1);

        let r = evaluate(&h, Some(&quote(price)), Some(&data), None, today);
        prop_assert!(!r.accruing);
        prop_assert_eq!(r.current_value, Some(invested));
        prop_assert_eq!(r.profit, Some(Decimal::ZERO));
        prop_assert_eq!(r.return_ratio, Some(Decimal::ZERO));
    }

    /// Without a declared cost, an off-exchange fund's unit cost is the NAV on
    /// its confirmation date.
    #[test]
    fn prop_unit_cost_is_confirmation_nav(
        points in arb_raw_points(),
        purchase in 0u32..70,
    ) {
        let data = nav_data(series_from(&points));
        let h = holding(HoldingKind::OffExchangeFund, purchase, Decimal::new(10_000, 0));

        let r = evaluate(&h, None, Some(&data), None, day(90));
        let expected = data.series.nav_on(r.settlement.confirmation_date);
        prop_assert!(expected.is_some());
        prop_assert_eq!(r.unit_cost, expected);
        prop_assert_eq!(r.unit_cost_source, Some(CostSource::ConfirmationNav));
    }

    /// Shares times unit cost gives back the invested amount.
    #[test]
    fn prop_shares_times_cost_is_invested(
        points in arb_raw_points(),
        kind in arb_kind(),
        purchase in 0u32..70,
        invested in 1i64..100_000_000,
        price in arb_nav(),
    ) {
        let invested = Decimal::new(invested, 2);
        let data = nav_data(series_from(&points));
        let h = holding(kind, purchase, invested);

        let r = evaluate(&h, Some(&quote(price)), Some(&data), None, day(90));
        let cost = r.unit_cost.unwrap();
        let shares = r.share_count.unwrap();
        let tolerance = Decimal::new(1, 10);
        prop_assert!((shares * cost - invested).abs() <= tolerance);
    }

    /// A curve has between two and seven points, all on or after purchase.
    #[test]
    fn prop_curve_is_bounded(
        points in arb_raw_points(),
        purchase in 0u32..70,
    ) {
        let series = series_from(&points);
        let eligible = series.dates().filter(|d| *d >= day(purchase)).count();
        let input = CurveInput {
            series: &series,
            purchase_date: day(purchase),
            share_count: Decimal::ONE_HUNDRED,
            invested_amount: Decimal::ONE_HUNDRED,
            accrual_start_date: day(purchase),
            price_factor: Decimal::ONE,
        };

        match build_curve(&input) {
            Ok(curve) => {
                prop_assert_eq!(curve.len(), eligible.min(CURVE_WINDOW));
                prop_assert!(curve.len() >= 2);
                prop_assert!(curve.iter().all(|p| p.date >= day(purchase)));
                prop_assert_eq!(curve[0].cumulative_return, Decimal::ZERO);
            }
            Err(_) => prop_assert!(eligible < 2),
        }
    }
}
