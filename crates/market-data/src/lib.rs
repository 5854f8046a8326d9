//! Fundboard Market Data Crate
//!
//! Fetches fund NAV history, live fund estimates and real-time exchange
//! quotes from public Chinese market data endpoints.
//!
//! # Overview
//!
//! - Three data kinds: NAV trend, live estimate, exchange quote
//! - Concrete sources: Sina, EastMoney push2, EastMoney pingzhongdata, fundgz
//! - Venue guessing and price magnitude normalization
//! - FIFO request sequencing per data kind, with per-call timeouts
//! - Quote fallback across providers and venues, first valid wins
//! - Per-kind TTL caches with stale fallback
//!
//! # Architecture
//!
//! ```text
//! +---------------------+
//! | MarketDataService   |  (cache, stale fallback)
//! +---------------------+
//!     |            |
//!     v            v
//! +-----------+ +---------------+
//! | Loaders   | | QuoteResolver |  (provider x venue fallback)
//! +-----------+ +---------------+
//!          |        |
//!          v        v
//!     +------------------+
//!     | RequestSequencer |  (one call in flight per kind)
//!     +------------------+
//!              |
//!              v
//!     +------------------+
//!     |    Providers     |  (fetch, parse, validate)
//!     +------------------+
//! ```

pub mod cache;
pub mod config;
pub mod errors;
pub mod loader;
pub mod models;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod service;

pub use models::{
    DataKind, EstimateSnapshot, NavData, NavPoint, NavSeries, ProviderId, Quote, RawEstimate,
    RawNavPoint, RawNavTrend, RawQuote, Venue,
};

pub use resolver::{guess_venue, normalize_magnitude, venue_candidates};

pub use provider::eastmoney::EastMoneyProvider;
pub use provider::fundgz::FundGzProvider;
pub use provider::pingzhong::PingZhongProvider;
pub use provider::sina::SinaProvider;
pub use provider::{EstimateProvider, NavTrendProvider, QuoteProvider};

pub use registry::{
    FetchDiagnostics, QuoteResolver, RecordValidator, RequestSequencer, SequencerMode,
};

pub use cache::{CacheStats, MarketDataCache, TtlCache};
pub use config::MarketDataConfig;
pub use errors::{MarketDataError, RetryClass};
pub use loader::{EstimateLoader, NavSeriesLoader};
pub use service::{Fetched, MarketDataService, MarketDataSource};
