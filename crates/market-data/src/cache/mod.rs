//! In-memory caches for fetched market data, one per data kind.

mod ttl_cache;

pub use ttl_cache::TtlCache;

use std::sync::Arc;
use std::time::Duration;

use crate::models::{DataKind, EstimateSnapshot, NavData, Quote};

/// Per-kind caches keyed by instrument code.
pub struct MarketDataCache {
    nav: TtlCache<NavData>,
    estimates: TtlCache<EstimateSnapshot>,
    quotes: TtlCache<Quote>,
}

impl MarketDataCache {
    pub fn new(nav_ttl: Duration, estimate_ttl: Duration, quote_ttl: Duration) -> Self {
        Self {
            nav: TtlCache::new(nav_ttl),
            estimates: TtlCache::new(estimate_ttl),
            quotes: TtlCache::new(quote_ttl),
        }
    }

    pub fn nav(&self) -> &TtlCache<NavData> {
        &self.nav
    }

    pub fn estimates(&self) -> &TtlCache<EstimateSnapshot> {
        &self.estimates
    }

    pub fn quotes(&self) -> &TtlCache<Quote> {
        &self.quotes
    }

    /// Drop every kind's entry for `code`.
    pub fn invalidate(&self, code: &str) {
        self.nav.invalidate(code);
        self.estimates.invalidate(code);
        self.quotes.invalidate(code);
    }

    pub fn clear_all(&self) {
        self.nav.clear();
        self.estimates.clear();
        self.quotes.clear();
    }

    pub fn ttl(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::NavTrend => self.nav.ttl(),
            DataKind::Estimate => self.estimates.ttl(),
            DataKind::Quote => self.quotes.ttl(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            nav_count: self.nav.len(),
            estimate_count: self.estimates.len(),
            quote_count: self.quotes.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub nav_count: usize,
    pub estimate_count: usize,
    pub quote_count: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.nav_count + self.estimate_count + self.quote_count
    }
}

/// Thread-safe handle to a [`MarketDataCache`]
pub type SharedMarketDataCache = Arc<MarketDataCache>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Venue;
    use rust_decimal_macros::dec;

    fn quote(code: &str) -> Quote {
        Quote {
            source_id: "SINA".to_string(),
            code: code.to_string(),
            venue: Venue::Shanghai,
            name: "300ETF".to_string(),
            price: dec!(4.012),
            change_pct: None,
            time: None,
        }
    }

    #[test]
    fn test_kinds_are_separate() {
        let cache = MarketDataCache::new(
            Duration::from_secs(3600),
            Duration::from_secs(60),
            Duration::from_secs(30),
        );
        cache.quotes().insert("510300", quote("510300"));

        assert!(cache.quotes().get_fresh("510300").is_some());
        assert!(cache.estimates().get_stale("510300").is_none());
        assert_eq!(cache.ttl(DataKind::Estimate), Duration::from_secs(60));
        assert_eq!(cache.stats().total(), 1);

        cache.invalidate("510300");
        assert_eq!(cache.stats().total(), 0);
    }
}
