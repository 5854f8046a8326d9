//! EastMoney "pingzhongdata" NAV trend source.
//!
//! The endpoint serves a script of global assignments. Two matter:
//!
//! ```text
//! var fS_name = "Growth Mixed";
//! var Data_netWorthTrend = [{"x":1705248000000,"y":1.042,"equityReturn":0.12,"unitMoney":""}, ...];
//! ```
//!
//! `x` is epoch milliseconds at local midnight, `y` the unit NAV.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{RawNavPoint, RawNavTrend};
use crate::provider::http::{build_client, cache_buster, fetch_text};
use crate::provider::NavTrendProvider;

const BASE_URL: &str = "https://fund.eastmoney.com/pingzhongdata/";
const REFERER: &str = "https://fund.eastmoney.com/";
const PROVIDER_ID: &str = "PINGZHONG";

lazy_static! {
    static ref NAME: Regex =
        Regex::new(r#"var\s+fS_name\s*=\s*"([^"]*)""#).expect("static pattern");
    static ref TREND: Regex =
        Regex::new(r"(?s)var\s+Data_netWorthTrend\s*=\s*(\[.*?\])\s*;").expect("static pattern");
}

#[derive(Debug, Deserialize)]
struct TrendItem {
    x: i64,
    #[serde(default)]
    y: Value,
}

/// NAV trend client.
pub struct PingZhongProvider {
    client: Client,
}

impl PingZhongProvider {
    pub fn new() -> Self {
        Self::with_client(build_client())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for PingZhongProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the pingzhongdata script.
///
/// A missing trend variable is malformed; a present but empty one parses to
/// an empty trend and the loader reports it as unavailable. Values that are
/// not numbers come through as NaN for the loader to drop.
pub fn parse_trend(body: &str) -> Result<RawNavTrend, MarketDataError> {
    let trend_json = TREND
        .captures(body)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "no Data_netWorthTrend"))?;

    let items: Vec<TrendItem> = serde_json::from_str(&trend_json).map_err(|e| {
        MarketDataError::malformed(PROVIDER_ID, format!("invalid trend array: {}", e))
    })?;

    let name = NAME
        .captures(body)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    let points = items
        .into_iter()
        .map(|item| RawNavPoint {
            timestamp_ms: item.x,
            nav: match &item.y {
                Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
                Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
                _ => f64::NAN,
            },
        })
        .collect();

    Ok(RawNavTrend { name, points })
}

#[async_trait]
impl NavTrendProvider for PingZhongProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_trend(&self, code: &str) -> Result<RawNavTrend, MarketDataError> {
        let url = format!("{}{}.js?v={}", BASE_URL, code.trim(), cache_buster());
        let body = fetch_text(&self.client, PROVIDER_ID, code, &url, Some(REFERER)).await?;
        parse_trend(&body)
    }
}
