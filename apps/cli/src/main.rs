mod config;
mod main_lib;
mod models;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let state = build_state(&config)?;

    tracing::info!(
        "Valuing holdings from {} with quote providers {:?}",
        config.holdings_path.display(),
        config.market_data.quote_providers
    );
    scheduler::run(state, &config).await
}
