use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Kind of data fetched from an external source.
///
/// Each kind is its own transport namespace: the request sequencer serializes
/// calls within a kind, and the cache keeps a separate TTL per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataKind {
    /// Historical per-day net asset value trend
    NavTrend,
    /// Live intraday valuation estimate
    Estimate,
    /// Real-time exchange quote
    Quote,
}

impl DataKind {
    pub const ALL: [DataKind; 3] = [DataKind::NavTrend, DataKind::Estimate, DataKind::Quote];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::NavTrend => "NAV_TREND",
            DataKind::Estimate => "ESTIMATE",
            DataKind::Quote => "QUOTE",
        }
    }
}
