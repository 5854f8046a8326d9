use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use fundboard_market_data::{DataKind, MarketDataSource, NavSeries};

use super::{evaluate, invalid_holding, Diagnostic, PriceSource, ValuationResult};
use crate::errors::{Result, ValuationError};
use crate::portfolio::holdings::{Holding, HoldingKind};
use crate::portfolio::performance::{
    build_curve, build_portfolio_curve, CurveInput, CurvePoint, PortfolioCurveInput,
};
use crate::portfolio::totals::{aggregate, apply_weights, PortfolioTotals};
use crate::utils::time_utils::Clock;

/// Output of one valuation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPass {
    pub valuation_date: NaiveDate,
    pub results: Vec<ValuationResult>,
    pub totals: PortfolioTotals,
}

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Value every holding and total the portfolio.
    ///
    /// Never fails as a whole: a holding whose data is missing gets undefined
    /// fields and diagnostics. A pass started while another is running waits
    /// for it to finish.
    async fn run_valuation_pass(&self, holdings: &[Holding]) -> ValuationPass;

    /// Trailing curve of one holding from the last pass.
    async fn build_curve(&self, holding_id: &str) -> Result<Vec<CurvePoint>>;

    /// Trailing curve of the whole portfolio from the last pass.
    async fn build_portfolio_curve(&self) -> Result<Vec<CurvePoint>>;
}

/// What the last pass knew about a holding, kept for curve building.
struct HoldingContext {
    holding: Holding,
    series: Option<NavSeries>,
    result: ValuationResult,
}

impl HoldingContext {
    /// Multiplier turning historical NAV into a market-price proxy.
    ///
    /// Only the current premium is known, so a dual-quoted holding valued at
    /// market applies it to every historical point.
    fn price_factor(&self) -> Decimal {
        let r = &self.result;
        if r.kind != HoldingKind::DualQuotedFund || r.price_source != Some(PriceSource::MarketPrice)
        {
            return Decimal::ONE;
        }
        match (r.market_price, r.current_nav) {
            (Some(market), Some(nav)) if nav > Decimal::ZERO => {
                market.checked_div(nav).unwrap_or(Decimal::ONE)
            }
            _ => Decimal::ONE,
        }
    }
}

pub struct ValuationService {
    market_data: Arc<dyn MarketDataSource>,
    clock: Arc<dyn Clock>,
    pass_lock: Mutex<()>,
    last_pass: RwLock<Vec<HoldingContext>>,
}

impl ValuationService {
    pub fn new(market_data: Arc<dyn MarketDataSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            market_data,
            clock,
            pass_lock: Mutex::new(()),
            last_pass: RwLock::new(Vec::new()),
        }
    }

    async fn value_holding(&self, holding: &Holding, today: NaiveDate) -> HoldingContext {
        let kind = holding.kind;
        let code = holding.code.trim();

        let (nav, estimate, quote) = tokio::join!(
            async {
                if kind.has_nav() {
                    Some(self.market_data.nav_data(code).await)
                } else {
                    None
                }
            },
            async {
                if kind.has_nav() {
                    self.market_data.estimate(code).await
                } else {
                    None
                }
            },
            async {
                if kind.has_quote() {
                    Some(self.market_data.quote(code).await)
                } else {
                    None
                }
            },
        );

        let mut data_diagnostics = Vec::new();

        let nav = match nav {
            Some(Ok(fetched)) => {
                if fetched.stale {
                    data_diagnostics.push(Diagnostic::StaleData {
                        kind: DataKind::NavTrend,
                    });
                }
                Some(fetched.value)
            }
            Some(Err(e)) => {
                data_diagnostics.push(Diagnostic::SeriesUnavailable {
                    reason: e.to_string(),
                });
                None
            }
            None => None,
        };

        let estimate = estimate.map(|fetched| {
            if fetched.stale {
                data_diagnostics.push(Diagnostic::StaleData {
                    kind: DataKind::Estimate,
                });
            }
            fetched.value
        });

        let quote = match quote {
            Some(Ok(fetched)) => {
                if fetched.stale {
                    data_diagnostics.push(Diagnostic::StaleData {
                        kind: DataKind::Quote,
                    });
                }
                Some(fetched.value)
            }
            Some(Err(e)) => {
                data_diagnostics.push(Diagnostic::QuoteUnavailable {
                    reason: e.to_string(),
                });
                None
            }
            None => None,
        };

        let mut result = evaluate(
            holding,
            quote.as_ref(),
            nav.as_ref(),
            estimate.as_ref(),
            today,
        );
        result.diagnostics.splice(0..0, data_diagnostics);

        if result.diagnostics.iter().any(Diagnostic::is_blocking) {
            warn!(
                "Holding {} ({}) not valued: {:?}",
                holding.id, holding.code, result.diagnostics
            );
        } else {
            debug!(
                "Holding {} ({}) valued at {:?} from {:?}",
                holding.id, holding.code, result.current_value, result.price_source
            );
        }

        HoldingContext {
            holding: holding.clone(),
            series: nav.map(|n| n.series),
            result,
        }
    }

    fn rejected(holding: &Holding, message: String, today: NaiveDate) -> HoldingContext {
        warn!("Holding {} rejected: {}", holding.id, message);
        HoldingContext {
            holding: holding.clone(),
            series: None,
            result: invalid_holding(holding, message, today),
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn run_valuation_pass(&self, holdings: &[Holding]) -> ValuationPass {
        let _pass = self.pass_lock.lock().await;
        let started = Instant::now();
        let today = self.clock.today();

        let mut seen = HashSet::new();
        let contexts = join_all(holdings.iter().map(|holding| {
            let verdict = match holding.validate() {
                Err(e) => Err(e.to_string()),
                Ok(()) if !seen.insert(holding.id.clone()) => {
                    Err(format!("duplicate holding id {}", holding.id))
                }
                Ok(()) => Ok(()),
            };
            async move {
                match verdict {
                    Ok(()) => self.value_holding(holding, today).await,
                    Err(message) => Self::rejected(holding, message, today),
                }
            }
        }))
        .await;

        let mut results: Vec<ValuationResult> =
            contexts.iter().map(|c| c.result.clone()).collect();
        let totals = aggregate(&results);
        apply_weights(&mut results, &totals);

        info!(
            "Valuation pass for {}: {} holdings, {} valued, value {} in {:?}",
            today,
            results.len(),
            totals.valued_count,
            totals.total_value,
            started.elapsed()
        );

        *self.last_pass.write().await = contexts;

        ValuationPass {
            valuation_date: today,
            results,
            totals,
        }
    }

    async fn build_curve(&self, holding_id: &str) -> Result<Vec<CurvePoint>> {
        let last_pass = self.last_pass.read().await;
        let context = last_pass
            .iter()
            .find(|c| c.holding.id == holding_id)
            .ok_or_else(|| ValuationError::UnknownHolding(holding_id.to_string()))?;

        let series = context
            .series
            .as_ref()
            .ok_or(ValuationError::InsufficientCurveData { points: 0 })?;
        let share_count =
            context
                .result
                .share_count
                .ok_or_else(|| ValuationError::UndeterminedCost {
                    holding_id: holding_id.to_string(),
                })?;

        let curve = build_curve(&CurveInput {
            series,
            purchase_date: context.holding.purchase_date,
            share_count,
            invested_amount: context.holding.invested_amount,
            accrual_start_date: context.result.settlement.accrual_start_date,
            price_factor: context.price_factor(),
        })?;
        Ok(curve)
    }

    async fn build_portfolio_curve(&self) -> Result<Vec<CurvePoint>> {
        let last_pass = self.last_pass.read().await;
        let inputs: Vec<PortfolioCurveInput<'_>> = last_pass
            .iter()
            .filter(|c| !c.result.has_diagnostic(|d| *d == Diagnostic::Overflow))
            .filter_map(|c| {
                Some(PortfolioCurveInput {
                    series: c.series.as_ref()?,
                    share_count: c.result.share_count?,
                    accrual_start_date: c.result.settlement.accrual_start_date,
                    price_factor: c.price_factor(),
                })
            })
            .collect();

        Ok(build_portfolio_curve(&inputs)?)
    }
}
