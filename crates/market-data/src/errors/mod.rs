//! Error types and fallback classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining fallback behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// None of these abort a valuation pass. Each layer catches the errors of the
/// layer below and turns them into an "unavailable" outcome for one holding.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The outbound call did not settle within its timeout.
    #[error("Timeout: {provider} ({code})")]
    SourceTimeout {
        /// The provider that timed out
        provider: String,
        /// The instrument code requested
        code: String,
    },

    /// The payload was structurally present but could not be parsed,
    /// or it parsed into something semantically invalid.
    #[error("Malformed response from {provider}: {message}")]
    SourceMalformed {
        /// The provider that returned the payload
        provider: String,
        /// Description of what was wrong
        message: String,
    },

    /// The provider has no data for this instrument (404, empty payload,
    /// or an empty record such as a blank name or zero price).
    #[error("Not found: {code} at {provider}")]
    SourceNotFound {
        /// The provider that was asked
        provider: String,
        /// The instrument code requested
        code: String,
    },

    /// The provider returned a non-success HTTP status other than 404/429.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// Every configured quote provider and venue was tried and all failed.
    #[error("All quote sources exhausted for {code}: {attempts}")]
    AllSourcesExhausted {
        /// The instrument code requested
        code: String,
        /// Summary of every attempt, in order
        attempts: String,
    },

    /// No usable NAV series could be loaded for the instrument.
    #[error("NAV series unavailable for {code}: {reason}")]
    SeriesUnavailable {
        /// The instrument code requested
        code: String,
        /// Why the series is unavailable
        reason: String,
    },

    /// Invalid market data configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the fallback classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use fundboard_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "SINA".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    ///
    /// let error = MarketDataError::SourceNotFound {
    ///     provider: "SINA".to_string(),
    ///     code: "161725".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::NextVenue);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::SourceTimeout { .. }
            | Self::SourceMalformed { .. }
            | Self::SourceNotFound { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => RetryClass::NextVenue,

            Self::RateLimited { .. } => RetryClass::NextProvider,

            Self::AllSourcesExhausted { .. }
            | Self::SeriesUnavailable { .. }
            | Self::Config(_) => RetryClass::Never,
        }
    }

    /// Short machine-readable tag, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SourceTimeout { .. } => "SOURCE_TIMEOUT",
            Self::SourceMalformed { .. } => "SOURCE_MALFORMED",
            Self::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            Self::ProviderError { .. } => "PROVIDER_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::AllSourcesExhausted { .. } => "ALL_SOURCES_EXHAUSTED",
            Self::SeriesUnavailable { .. } => "SERIES_UNAVAILABLE",
            Self::Config(_) => "CONFIG",
            Self::Network(_) => "NETWORK",
        }
    }

    pub(crate) fn not_found(provider: &str, code: &str) -> Self {
        Self::SourceNotFound {
            provider: provider.to_string(),
            code: code.to_string(),
        }
    }

    pub(crate) fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::SourceMalformed {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
