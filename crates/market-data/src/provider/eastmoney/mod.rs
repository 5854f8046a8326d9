//! EastMoney push2 real-time quote source.
//!
//! `GET /api/qt/stock/get?secid=<market>.<code>&fields=f43,f58,f170,f60`
//! returns `{"rc":0,"data":{"f43":4012,"f58":"300ETF","f170":30,"f60":4000}}`.
//!
//! - `f43` last price as a scaled integer, undone with [`normalize_magnitude`]
//! - `f58` name
//! - `f170` day change in hundredths of a percent
//! - `f60` previous close, scaled like `f43`
//!
//! `data: null` means the secid is unknown. Suspended instruments report "-".

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{Quote, RawQuote, Venue};
use crate::provider::http::{build_client, fetch_text};
use crate::provider::QuoteProvider;
use crate::registry::RecordValidator;
use crate::resolver::normalize_magnitude;

const BASE_URL: &str = "https://push2.eastmoney.com/api/qt/stock/get";
const FIELDS: &str = "f43,f58,f170,f60";
const PROVIDER_ID: &str = "EASTMONEY";

lazy_static! {
    /// `cb_123({...});` when the endpoint is called JSONP-style
    static ref JSONP_WRAPPER: Regex =
        Regex::new(r"(?s)^\s*[A-Za-z_$][\w$]*\s*\((.*)\)\s*;?\s*$").expect("static pattern");
}

#[derive(Debug, Deserialize)]
struct Push2Response {
    #[serde(default)]
    data: Option<Push2Data>,
}

#[derive(Debug, Deserialize)]
struct Push2Data {
    #[serde(default)]
    f43: Value,
    #[serde(default)]
    f58: Option<String>,
    #[serde(default)]
    f170: Value,
    #[serde(default)]
    f60: Value,
}

/// EastMoney quote client.
pub struct EastMoneyProvider {
    client: Client,
    validator: RecordValidator,
}

impl EastMoneyProvider {
    pub fn new() -> Self {
        Self::with_client(build_client())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            validator: RecordValidator::new(),
        }
    }
}

impl Default for EastMoneyProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn secid(code: &str, venue: Venue) -> String {
    format!("{}.{}", venue.market_id(), code.trim())
}

/// Numbers arrive as JSON numbers, or as "-" when the market is closed for
/// the instrument.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse a push2 body, plain JSON or JSONP-wrapped.
pub fn parse_quote(body: &str, code: &str) -> Result<RawQuote, MarketDataError> {
    let json = match JSONP_WRAPPER.captures(body) {
        Some(caps) if !body.trim_start().starts_with('{') => caps[1].to_string(),
        _ => body.to_string(),
    };

    let response: Push2Response = serde_json::from_str(&json)
        .map_err(|e| MarketDataError::malformed(PROVIDER_ID, format!("invalid JSON: {}", e)))?;

    let data = response
        .data
        .ok_or_else(|| MarketDataError::not_found(PROVIDER_ID, code))?;

    let price = as_number(&data.f43)
        .map(normalize_magnitude)
        .unwrap_or(f64::NAN);
    let previous_close = as_number(&data.f60)
        .map(normalize_magnitude)
        .filter(|p| p.is_finite() && *p > 0.0);

    Ok(RawQuote {
        name: data.f58.unwrap_or_default(),
        price,
        previous_close,
        change_pct: as_number(&data.f170).map(|bp| bp / 10_000.0),
        time: None,
    })
}

#[async_trait]
impl QuoteProvider for EastMoneyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quote(&self, code: &str, venue: Venue) -> Result<Quote, MarketDataError> {
        let url = reqwest::Url::parse_with_params(
            BASE_URL,
            &[("secid", secid(code, venue).as_str()), ("fields", FIELDS)],
        )
        .map_err(|e| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to build URL: {}", e),
        })?;

        let body = fetch_text(&self.client, PROVIDER_ID, code, url.as_str(), None).await?;
        let raw = parse_quote(&body, code)?;
        self.validator.validate_quote(PROVIDER_ID, code, venue, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_secid() {
        assert_eq!(secid("510300", Venue::Shanghai), "1.510300");
        assert_eq!(secid("161725", Venue::Shenzhen), "0.161725");
    }

    #[test]
    fn test_parse_scaled_price() {
        let body = r#"{"rc":0,"rt":4,"data":{"f43":4012,"f58":"300ETF","f170":30,"f60":4000}}"#;
        let raw = parse_quote(body, "510300").unwrap();
        assert_eq!(raw.name, "300ETF");
        assert!((raw.price - 4.012).abs() < 1e-12);
        assert!((raw.change_pct.unwrap() - 0.003).abs() < 1e-12);
        assert_eq!(raw.previous_close, Some(4.0));
    }

    #[test]
    fn test_parse_jsonp_wrapped() {
        let body = r#"cb_1705300000000({"rc":0,"data":{"f43":1234,"f58":"LOF","f170":-12,"f60":1236});"#;
        let raw = parse_quote(body, "161725").unwrap();
        assert!((raw.price - 1.234).abs() < 1e-12);
        assert!((raw.change_pct.unwrap() + 0.0012).abs() < 1e-12);
    }

    #[test]
    fn test_null_data_is_not_found() {
        let err = parse_quote(r#"{"rc":0,"data":null}"#, "999999").unwrap_err();
        assert!(matches!(err, MarketDataError::SourceNotFound { .. }));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_quote("<html>", "510300").unwrap_err();
        assert!(matches!(err, MarketDataError::SourceMalformed { .. }));
    }

    #[test]
    fn test_suspended_dash_fields_fail_validation() {
        let body = r#"{"rc":0,"data":{"f43":"-","f58":"300ETF","f170":"-","f60":"-"}}"#;
        let raw = parse_quote(body, "510300").unwrap();
        assert!(raw.price.is_nan());
        assert!(raw.change_pct.is_none());

        let err = RecordValidator::new()
            .validate_quote(PROVIDER_ID, "510300", Venue::Shanghai, raw)
            .unwrap_err();
        assert!(matches!(err, MarketDataError::SourceNotFound { .. }));
    }

    #[test]
    fn test_validated_quote_carries_source() {
        let body = r#"{"rc":0,"data":{"f43":4012,"f58":"300ETF","f170":30,"f60":4000}}"#;
        let raw = parse_quote(body, "510300").unwrap();
        let quote = RecordValidator::new()
            .validate_quote(PROVIDER_ID, "510300", Venue::Shanghai, raw)
            .unwrap();
        assert_eq!(quote.source_id, "EASTMONEY");
        assert_eq!(quote.price, dec!(4.012));
        assert_eq!(quote.change_pct, Some(dec!(0.003)));
    }
}
