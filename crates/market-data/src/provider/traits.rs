//! Data source traits.
//!
//! One trait per data kind. A concrete client is specialized to a single
//! endpoint and returns a validated record or fails; it never retries and
//! never falls back. Fallback lives in the registry, sequencing and timeouts
//! in [`RequestSequencer`](crate::registry::RequestSequencer).

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{EstimateSnapshot, Quote, RawNavTrend, Venue};

/// Real-time exchange quote source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fundboard_market_data::provider::QuoteProvider;
///
/// struct MyQuotes;
///
/// #[async_trait]
/// impl QuoteProvider for MyQuotes {
///     fn id(&self) -> &'static str {
///         "MY_QUOTES"
///     }
///
///     async fn fetch_quote(&self, code: &str, venue: Venue) -> Result<Quote, MarketDataError> {
///         // ... request, parse, validate
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Constant identifier such as "SINA" or "EASTMONEY".
    ///
    /// Used in configuration, logs and as the quote's `source_id`.
    fn id(&self) -> &'static str;

    /// Fetch the quote for `code` listed on `venue`.
    ///
    /// A payload that parses but carries an empty record must fail with
    /// [`MarketDataError::SourceNotFound`].
    async fn fetch_quote(&self, code: &str, venue: Venue) -> Result<Quote, MarketDataError>;
}

/// Historical per-day NAV trend source.
#[async_trait]
pub trait NavTrendProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Fetch the raw trend. Normalization happens in the loader.
    async fn fetch_trend(&self, code: &str) -> Result<RawNavTrend, MarketDataError>;
}

/// Live intraday valuation estimate source.
#[async_trait]
pub trait EstimateProvider: Send + Sync {
    fn id(&self) -> &'static str;

    async fn fetch_estimate(&self, code: &str) -> Result<EstimateSnapshot, MarketDataError>;
}
