use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fundboard_core::{Holding, SystemClock, ValuationService, ValuationServiceTrait};
use fundboard_market_data::MarketDataService;

use crate::config::Config;
use crate::models::PassReport;

pub struct AppState {
    pub market_data: Arc<MarketDataService>,
    pub valuation: Arc<ValuationService>,
}

/// Logs go to stderr so stdout carries only the JSON reports.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let market_data = Arc::new(
        MarketDataService::new(&config.market_data).context("building market data service")?,
    );
    let clock = Arc::new(SystemClock::new(config.market_data.timezone));
    let valuation = Arc::new(ValuationService::new(market_data.clone(), clock));

    Ok(Arc::new(AppState {
        market_data,
        valuation,
    }))
}

/// Read the holdings file: a JSON array of holdings.
pub fn load_holdings(path: &Path) -> anyhow::Result<Vec<Holding>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading holdings from {}", path.display()))?;
    let holdings: Vec<Holding> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing holdings in {}", path.display()))?;
    Ok(holdings)
}

/// One valuation pass plus the curves that can be drawn from it.
pub async fn run_pass(state: &AppState, holdings: &[Holding]) -> PassReport {
    let pass = state.valuation.run_valuation_pass(holdings).await;

    let mut curves = BTreeMap::new();
    for result in &pass.results {
        if curves.contains_key(&result.holding_id) {
            continue;
        }
        match state.valuation.build_curve(&result.holding_id).await {
            Ok(curve) => {
                curves.insert(result.holding_id.clone(), curve);
            }
            Err(e) => tracing::debug!("No curve for {}: {}", result.holding_id, e),
        }
    }

    let portfolio_curve = match state.valuation.build_portfolio_curve().await {
        Ok(curve) => Some(curve),
        Err(e) => {
            tracing::debug!("No portfolio curve: {}", e);
            None
        }
    };

    let stats = state.market_data.cache().stats();
    tracing::debug!(
        "Cache holds {} NAV series, {} estimates, {} quotes",
        stats.nav_count,
        stats.estimate_count,
        stats.quote_count
    );

    PassReport {
        valuation_date: pass.valuation_date,
        results: pass.results,
        totals: pass.totals,
        curves,
        portfolio_curve,
    }
}
