//! Environment configuration for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use fundboard_market_data::{MarketDataConfig, SequencerMode};

pub struct Config {
    pub holdings_path: PathBuf,
    /// `None` runs a single pass
    pub refresh_interval: Option<Duration>,
    pub log_format: String,
    pub market_data: MarketDataConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let holdings_path = lookup("FB_HOLDINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("holdings.json"));

        let refresh_secs: u64 = match lookup("FB_REFRESH_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid FB_REFRESH_INTERVAL_SECS '{}'", raw))?,
            None => 0,
        };
        let refresh_interval = (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs));

        let log_format = lookup("FB_LOG_FORMAT").unwrap_or_else(|| "text".to_string());

        let mut market_data = MarketDataConfig::default();
        if let Some(raw) = lookup("FB_SOURCE_TIMEOUT_MS") {
            market_data.source_timeout_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid FB_SOURCE_TIMEOUT_MS '{}'", raw))?;
        }
        if let Some(raw) = lookup("FB_QUOTE_PROVIDERS") {
            market_data.quote_providers = raw
                .split(',')
                .map(|id| id.trim().to_ascii_uppercase())
                .filter(|id| !id.is_empty())
                .collect();
        }
        if let Some(raw) = lookup("FB_MARKET_TZ") {
            market_data.timezone = raw
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow!("invalid FB_MARKET_TZ '{}': {}", raw, e))?;
        }
        if let Some(raw) = lookup("FB_SEQUENCER_MODE") {
            market_data.sequencer_mode = match raw.trim().to_ascii_lowercase().as_str() {
                "per-kind" => SequencerMode::PerKind,
                "global" => SequencerMode::Global,
                other => return Err(anyhow!("invalid FB_SEQUENCER_MODE '{}'", other)),
            };
        }
        market_data.validate()?;

        Ok(Self {
            holdings_path,
            refresh_interval,
            log_format,
            market_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.holdings_path, PathBuf::from("holdings.json"));
        assert_eq!(config.refresh_interval, None);
        assert_eq!(config.log_format, "text");
        assert_eq!(config.market_data, MarketDataConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("FB_HOLDINGS_PATH", "/data/mine.json"),
            ("FB_REFRESH_INTERVAL_SECS", "60"),
            ("FB_SOURCE_TIMEOUT_MS", "10000"),
            ("FB_QUOTE_PROVIDERS", "eastmoney, sina"),
            ("FB_MARKET_TZ", "Asia/Hong_Kong"),
            ("FB_SEQUENCER_MODE", "global"),
        ])
        .unwrap();
        assert_eq!(config.holdings_path, PathBuf::from("/data/mine.json"));
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(60)));
        assert_eq!(config.market_data.source_timeout_ms, 10_000);
        assert_eq!(config.market_data.quote_providers, vec!["EASTMONEY", "SINA"]);
        assert_eq!(config.market_data.timezone, chrono_tz::Asia::Hong_Kong);
        assert_eq!(config.market_data.sequencer_mode, SequencerMode::Global);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(from_map(&[("FB_REFRESH_INTERVAL_SECS", "soon")]).is_err());
        assert!(from_map(&[("FB_MARKET_TZ", "Mars/Olympus")]).is_err());
        assert!(from_map(&[("FB_QUOTE_PROVIDERS", "YAHOO")]).is_err());
        assert!(from_map(&[("FB_QUOTE_PROVIDERS", " , ")]).is_err());
    }
}
