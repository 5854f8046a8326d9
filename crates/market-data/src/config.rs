//! Market data configuration.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;
use crate::registry::SequencerMode;

/// Bounds for the per-call source timeout.
pub const MIN_SOURCE_TIMEOUT: Duration = Duration::from_secs(8);
pub const MAX_SOURCE_TIMEOUT: Duration = Duration::from_secs(12);

/// Quote provider ids known to [`MarketDataService::new`](crate::MarketDataService::new).
pub const KNOWN_QUOTE_PROVIDERS: &[&str] = &["SINA", "EASTMONEY"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketDataConfig {
    /// Per-call timeout; clamped into 8..=12 seconds
    pub source_timeout_ms: u64,
    pub quote_ttl_secs: u64,
    pub estimate_ttl_secs: u64,
    pub nav_ttl_secs: u64,
    /// Quote providers in priority order
    pub quote_providers: Vec<String>,
    /// Home timezone of the NAV series
    pub timezone: Tz,
    pub sequencer_mode: SequencerMode,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            source_timeout_ms: 8_000,
            quote_ttl_secs: 30,
            estimate_ttl_secs: 60,
            nav_ttl_secs: 3_600,
            quote_providers: KNOWN_QUOTE_PROVIDERS.iter().map(|s| s.to_string()).collect(),
            timezone: chrono_tz::Asia::Shanghai,
            sequencer_mode: SequencerMode::PerKind,
        }
    }
}

impl MarketDataConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms).clamp(MIN_SOURCE_TIMEOUT, MAX_SOURCE_TIMEOUT)
    }

    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_ttl_secs)
    }

    pub fn estimate_ttl(&self) -> Duration {
        Duration::from_secs(self.estimate_ttl_secs)
    }

    pub fn nav_ttl(&self) -> Duration {
        Duration::from_secs(self.nav_ttl_secs)
    }

    /// Reject an empty, duplicated or unknown quote provider list.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if self.quote_providers.is_empty() {
            return Err(MarketDataError::Config(
                "at least one quote provider is required".to_string(),
            ));
        }
        for (i, id) in self.quote_providers.iter().enumerate() {
            if !KNOWN_QUOTE_PROVIDERS.contains(&id.as_str()) {
                return Err(MarketDataError::Config(format!(
                    "unknown quote provider '{}', expected one of {:?}",
                    id, KNOWN_QUOTE_PROVIDERS
                )));
            }
            if self.quote_providers[..i].contains(id) {
                return Err(MarketDataError::Config(format!(
                    "quote provider '{}' listed twice",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarketDataConfig::default();
        assert_eq!(config.source_timeout(), Duration::from_secs(8));
        assert_eq!(config.quote_providers, vec!["SINA", "EASTMONEY"]);
        assert_eq!(config.timezone, chrono_tz::Asia::Shanghai);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_is_clamped() {
        let mut config = MarketDataConfig {
            source_timeout_ms: 500,
            ..Default::default()
        };
        assert_eq!(config.source_timeout(), MIN_SOURCE_TIMEOUT);
        config.source_timeout_ms = 60_000;
        assert_eq!(config.source_timeout(), MAX_SOURCE_TIMEOUT);
        config.source_timeout_ms = 10_000;
        assert_eq!(config.source_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_bad_provider_lists() {
        let mut config = MarketDataConfig {
            quote_providers: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.quote_providers = vec!["YAHOO".to_string()];
        assert!(config.validate().is_err());

        config.quote_providers = vec!["SINA".to_string(), "SINA".to_string()];
        assert!(config.validate().is_err());

        config.quote_providers = vec!["EASTMONEY".to_string(), "SINA".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: MarketDataConfig =
            serde_json::from_str(r#"{"quoteProviders":["EASTMONEY"],"sequencerMode":"global"}"#)
                .unwrap();
        assert_eq!(config.quote_providers, vec!["EASTMONEY"]);
        assert_eq!(config.sequencer_mode, SequencerMode::Global);
        assert_eq!(config.quote_ttl_secs, 30);
    }
}
