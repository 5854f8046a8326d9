use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instrument::Venue;

/// Quote as parsed from a provider payload, before validation.
///
/// Prices may still be scaled or non-finite here.
#[derive(Clone, Debug, PartialEq)]
pub struct RawQuote {
    pub name: String,
    pub price: f64,
    /// Previous close, when the payload carries it
    pub previous_close: Option<f64>,
    /// Day change as a fraction (0.0123 = 1.23%), when the payload carries it
    pub change_pct: Option<f64>,
    /// Provider timestamp text ("2024-01-15 15:00:00"), if any
    pub time: Option<String>,
}

/// Validated real-time exchange quote.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Provider that produced this quote (SINA, EASTMONEY, ...)
    pub source_id: String,

    /// Instrument code as requested
    pub code: String,

    /// Venue the successful request was made against
    pub venue: Venue,

    /// Instrument name reported by the provider
    pub name: String,

    /// Last traded price, always > 0
    pub price: Decimal,

    /// Day change as a fraction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<Decimal>,

    /// Provider timestamp text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}
