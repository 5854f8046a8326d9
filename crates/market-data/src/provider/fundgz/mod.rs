//! Tiantian fundgz live estimate source.
//!
//! Always answers with the same JSONP callback name:
//!
//! ```text
//! jsonpgz({"fundcode":"000001","name":"...","jzrq":"2024-01-12","dwjz":"1.0420",
//!          "gsz":"1.0474","gszzl":"0.52","gztime":"2024-01-15 15:00"});
//! ```
//!
//! `jsonpgz();` means there is no estimate for the code (e.g. an ETF).

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{EstimateSnapshot, RawEstimate};
use crate::provider::http::{build_client, cache_buster, fetch_text};
use crate::provider::EstimateProvider;
use crate::registry::RecordValidator;

const BASE_URL: &str = "https://fundgz.1234567.com.cn/js/";
const REFERER: &str = "https://fund.eastmoney.com/";
const PROVIDER_ID: &str = "FUNDGZ";

lazy_static! {
    static ref CALLBACK: Regex =
        Regex::new(r"(?s)jsonpgz\s*\((.*)\)\s*;?").expect("static pattern");
}

/// Every field arrives as a string.
#[derive(Debug, Deserialize)]
struct GzPayload {
    #[serde(default)]
    fundcode: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    jzrq: Option<String>,
    #[serde(default)]
    dwjz: Option<String>,
    #[serde(default)]
    gsz: Option<String>,
    #[serde(default)]
    gszzl: Option<String>,
    #[serde(default)]
    gztime: Option<String>,
}

fn number(field: &Option<String>) -> Option<f64> {
    field.as_deref().and_then(|s| s.trim().parse::<f64>().ok())
}

fn text(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// Estimate client.
pub struct FundGzProvider {
    client: Client,
    validator: RecordValidator,
}

impl FundGzProvider {
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

impl Default for FundGzProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a fundgz JSONP body.
pub fn parse_estimate(body: &str, code: &str) -> Result<RawEstimate, MarketDataError> {
    let inner = CALLBACK
        .captures(body)
        .map(|caps| caps[1].trim().to_string())
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "no jsonpgz callback"))?;

    if inner.is_empty() {
        return Err(MarketDataError::not_found(PROVIDER_ID, code));
    }

    let payload: GzPayload = serde_json::from_str(&inner)
        .map_err(|e| MarketDataError::malformed(PROVIDER_ID, format!("invalid JSON: {}", e)))?;

    Ok(RawEstimate {
        estimated_nav: number(&payload.gsz),
        estimated_change_pct: number(&payload.gszzl),
        reference_nav: number(&payload.dwjz),
        code: payload.fundcode,
        name: payload.name,
        as_of_time: text(payload.gztime),
        reference_date: text(payload.jzrq),
    })
}

#[async_trait]
impl EstimateProvider for FundGzProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_estimate(&self, code: &str) -> Result<EstimateSnapshot, MarketDataError> {
        let url = format!("{}{}.js?rt={}", BASE_URL, code.trim(), cache_buster());
        let body = fetch_text(&self.client, PROVIDER_ID, code, &url, Some(REFERER)).await?;
        let raw = parse_estimate(&body, code)?;
        self.validator.validate_estimate(PROVIDER_ID, code, raw)
    }
}
