//! End-to-end valuation passes against an in-memory market data source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fundboard_core::{
    CostSource, Diagnostic, FixedClock, Holding, HoldingKind, PriceSource, PricingMode,
    ValuationService, ValuationServiceTrait,
};
use fundboard_market_data::{
    EstimateSnapshot, Fetched, MarketDataError, MarketDataSource, NavData, NavPoint, NavSeries,
    Quote, Venue,
};

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, day).unwrap()
}

#[derive(Default)]
struct InMemorySource {
    navs: HashMap<String, NavData>,
    estimates: HashMap<String, EstimateSnapshot>,
    quotes: HashMap<String, Quote>,
}

impl InMemorySource {
    fn nav(mut self, code: &str, points: &[(NaiveDate, Decimal)]) -> Self {
        let series = NavSeries::from_points(points.iter().map(|&(date, nav)| NavPoint {
            date,
            net_asset_value: nav,
        }));
        let last = *series.last().unwrap();
        self.navs.insert(
            code.to_string(),
            NavData {
                code: code.to_string(),
                name: String::new(),
                series,
                latest_nav: last.net_asset_value,
                latest_nav_date: last.date,
                latest_daily_change_pct: None,
            },
        );
        self
    }

    fn estimate(mut self, code: &str, estimated: Decimal, reference: Decimal) -> Self {
        self.estimates.insert(
            code.to_string(),
            EstimateSnapshot {
                code: code.to_string(),
                name: "Estimated".to_string(),
                estimated_nav: Some(estimated),
                estimated_change_pct: None,
                as_of_time: None,
                reference_date: Some(d(1, 19)),
                reference_nav: Some(reference),
            },
        );
        self
    }

    fn quote(mut self, code: &str, price: Decimal) -> Self {
        self.quotes.insert(
            code.to_string(),
            Quote {
                source_id: "EASTMONEY".to_string(),
                code: code.to_string(),
                venue: Venue::Shenzhen,
                name: "Listed".to_string(),
                price,
                change_pct: None,
                time: None,
            },
        );
        self
    }
}

#[async_trait]
impl MarketDataSource for InMemorySource {
    async fn nav_data(&self, code: &str) -> Result<Fetched<NavData>, MarketDataError> {
        self.navs
            .get(code)
            .cloned()
            .map(Fetched::fresh)
            .ok_or_else(|| MarketDataError::SeriesUnavailable {
                code: code.to_string(),
                reason: "not loaded".to_string(),
            })
    }

    async fn estimate(&self, code: &str) -> Option<Fetched<EstimateSnapshot>> {
        self.estimates.get(code).cloned().map(Fetched::fresh)
    }

    async fn quote(&self, code: &str) -> Result<Fetched<Quote>, MarketDataError> {
        self.quotes
            .get(code)
            .cloned()
            .map(Fetched::fresh)
            .ok_or_else(|| MarketDataError::AllSourcesExhausted {
                code: code.to_string(),
                attempts: "SINA@sz: SOURCE_TIMEOUT -> SINA@sh: SOURCE_TIMEOUT".to_string(),
            })
    }
}

fn holding(id: &str, code: &str, kind: HoldingKind, invested: Decimal) -> Holding {
    Holding {
        id: id.to_string(),
        code: code.to_string(),
        kind,
        purchase_date: d(1, 10),
        invested_amount: invested,
        declared_unit_cost: None,
        pricing_mode: None,
        name: None,
    }
}

fn service(source: InMemorySource, today: NaiveDate) -> ValuationService {
    ValuationService::new(Arc::new(source), Arc::new(FixedClock(today)))
}

#[tokio::test]
async fn off_exchange_fund_valued_at_latest_nav() {
    let source = InMemorySource::default().nav(
        "000001",
        &[
            (d(1, 10), dec!(1.2345)),
            (d(1, 11), dec!(1.2400)),
            (d(1, 19), dec!(1.3000)),
        ],
    );
    let svc = service(source, d(1, 20));
    let holdings = vec![holding("a", "000001", HoldingKind::OffExchangeFund, dec!(10000))];

    let pass = svc.run_valuation_pass(&holdings).await;
    let r = &pass.results[0];

    assert_eq!(r.settlement.confirmation_date, d(1, 10));
    assert_eq!(r.settlement.accrual_start_date, d(1, 11));
    assert_eq!(r.unit_cost, Some(dec!(1.2345)));
    assert_eq!(r.unit_cost_source, Some(CostSource::ConfirmationNav));
    assert_eq!(r.share_count.unwrap().round_dp(4), dec!(8100.4455));
    assert_eq!(r.current_value.unwrap().round_dp(2), dec!(10530.58));
    assert_eq!(r.profit.unwrap().round_dp(2), dec!(530.58));
    assert_eq!(r.return_ratio.unwrap().round_dp(4), dec!(0.0531));
    assert_eq!(r.holding_days, 9);
    assert!(r.diagnostics.is_empty());

    assert_eq!(pass.totals.total_invested, dec!(10000));
    assert_eq!(pass.totals.valued_count, 1);
}

#[tokio::test]
async fn off_exchange_fund_uses_live_estimate() {
    let source = InMemorySource::default()
        .nav("000001", &[(d(1, 10), dec!(1.0)), (d(1, 11), dec!(1.0))])
        .estimate("000001", dec!(1.05), dec!(1.0));
    let svc = service(source, d(1, 20));
    let holdings = vec![holding("a", "000001", HoldingKind::OffExchangeFund, dec!(1000))];

    let pass = svc.run_valuation_pass(&holdings).await;
    let r = &pass.results[0];
    assert_eq!(r.price_source, Some(PriceSource::Estimate));
    assert_eq!(r.current_value, Some(dec!(1050)));
    assert_eq!(r.name.as_deref(), Some("Estimated"));
}

#[tokio::test]
async fn dual_quoted_fund_at_market_price_reports_premium() {
    let source = InMemorySource::default()
        .nav("161725", &[(d(1, 10), dec!(1.10)), (d(1, 11), dec!(1.10))])
        .quote("161725", dec!(1.21));
    let svc = service(source, d(1, 20));
    let mut h = holding("l", "161725", HoldingKind::DualQuotedFund, dec!(1100));
    h.pricing_mode = Some(PricingMode::MarketPrice);

    let pass = svc.run_valuation_pass(&[h]).await;
    let r = &pass.results[0];
    assert_eq!(r.premium_ratio.unwrap().round_dp(4), dec!(0.1));
    assert_eq!(r.price_source, Some(PriceSource::MarketPrice));
    assert_eq!(r.current_value, Some(dec!(1210)));
    assert_eq!(r.quote_source.as_deref(), Some("EASTMONEY"));
}

#[tokio::test]
async fn dual_quoted_fund_at_nav_ignores_market_for_value() {
    let source = InMemorySource::default()
        .nav("161725", &[(d(1, 10), dec!(1.10)), (d(1, 11), dec!(1.10))])
        .quote("161725", dec!(1.21));
    let svc = service(source, d(1, 20));
    let mut h = holding("l", "161725", HoldingKind::DualQuotedFund, dec!(1100));
    h.pricing_mode = Some(PricingMode::NetAssetValue);

    let pass = svc.run_valuation_pass(&[h]).await;
    let r = &pass.results[0];
    assert_eq!(r.price_source, Some(PriceSource::LatestNav));
    assert_eq!(r.current_value, Some(dec!(1100)));
    assert!(r.premium_ratio.is_some());
}

#[tokio::test]
async fn missing_everything_leaves_fields_undefined() {
    let svc = service(InMemorySource::default().quote("510300", dec!(4)), d(1, 20));
    let holdings = vec![
        holding("ok", "510300", HoldingKind::ExchangeTraded, dec!(400)),
        holding("gone", "000009", HoldingKind::OffExchangeFund, dec!(600)),
    ];

    let pass = svc.run_valuation_pass(&holdings).await;
    let gone = &pass.results[1];
    assert_eq!(gone.unit_cost, None);
    assert_eq!(gone.share_count, None);
    assert_eq!(gone.current_value, None);
    assert_eq!(gone.profit, None);
    assert!(gone.has_diagnostic(|d| matches!(d, Diagnostic::SeriesUnavailable { .. })));
    assert!(gone.has_diagnostic(|d| matches!(d, Diagnostic::UndeterminedCost)));

    assert_eq!(pass.totals.total_invested, dec!(1000));
    assert_eq!(pass.totals.total_value, dec!(400));
    assert_eq!(pass.totals.total_profit, dec!(0));
    assert_eq!(pass.totals.excluded_holding_ids, vec!["gone".to_string()]);
}

#[tokio::test]
async fn purchase_not_yet_accruing_holds_invested_amount() {
    let source = InMemorySource::default().nav(
        "000001",
        &[(d(1, 10), dec!(1.0)), (d(1, 11), dec!(1.5))],
    );
    let svc = service(source, d(1, 10));
    let holdings = vec![holding("a", "000001", HoldingKind::OffExchangeFund, dec!(1000))];

    let pass = svc.run_valuation_pass(&holdings).await;
    let r = &pass.results[0];
    assert!(!r.accruing);
    assert_eq!(r.current_value, Some(dec!(1000)));
    assert_eq!(r.profit, Some(dec!(0)));
    assert!(r.has_diagnostic(|d| matches!(d, Diagnostic::NotYetAccruing { .. })));
}

#[tokio::test]
async fn curve_keeps_trailing_seven_dates() {
    let points: Vec<(NaiveDate, Decimal)> = (8..18)
        .map(|day| (d(1, day), Decimal::ONE + Decimal::new(i64::from(day) - 8, 2)))
        .collect();
    let source = InMemorySource::default().nav("000001", &points);
    let svc = service(source, d(1, 20));
    let holdings = vec![holding("a", "000001", HoldingKind::OffExchangeFund, dec!(1000))];
    svc.run_valuation_pass(&holdings).await;

    let curve = svc.build_curve("a").await.unwrap();
    assert_eq!(curve.len(), 7);
    assert_eq!(curve.first().unwrap().date, d(1, 11));
    assert_eq!(curve.last().unwrap().date, d(1, 17));
}
