//! Single-shot or periodic valuation passes.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::Config;
use crate::main_lib::{load_holdings, run_pass, AppState};

/// Run one pass, or one per refresh interval until interrupted.
///
/// The holdings file is re-read before every pass. A pass always runs to
/// completion; an interrupt that arrives during one stops the loop once it
/// returns.
pub async fn run(state: Arc<AppState>, config: &Config) -> anyhow::Result<()> {
    let Some(period) = config.refresh_interval else {
        return run_once(&state, &config.holdings_path).await;
    };

    info!("Refreshing every {:?}", period);
    let state = &state;
    let holdings_path = config.holdings_path.as_path();
    refresh_loop(period, tokio::signal::ctrl_c(), || async move {
        if let Err(e) = run_once(state, holdings_path).await {
            warn!("Valuation pass failed: {:#}", e);
        }
    })
    .await;
    Ok(())
}

/// Call `pass` once per `period` until `shutdown` resolves.
///
/// `shutdown` is created once and stays pinned across iterations, so a
/// signal that lands while a pass is running is seen as soon as that pass
/// returns.
async fn refresh_loop<S, P, F>(period: Duration, shutdown: S, mut pass: P)
where
    S: Future,
    P: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Interrupted, stopping refresh loop");
                return;
            }
            _ = ticker.tick() => {}
        }
        pass().await;
    }
}

async fn run_once(state: &AppState, holdings_path: &Path) -> anyhow::Result<()> {
    let holdings = load_holdings(holdings_path)?;
    let report = run_pass(state, &holdings).await;

    if !report.totals.excluded_holding_ids.is_empty() {
        warn!(
            "Excluded from totals: {}",
            report.totals.excluded_holding_ids.join(", ")
        );
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
