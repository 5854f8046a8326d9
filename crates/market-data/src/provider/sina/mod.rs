//! Sina Finance real-time quote source.
//!
//! The endpoint answers with a script assigning one comma-separated string:
//!
//! ```text
//! var hq_str_sh510300="300ETF,4.010,4.000,4.012,4.020,3.995,...,2024-01-15,15:00:00,00";
//! ```
//!
//! Fields used: 0 name, 2 previous close, 3 last price, and the date/time
//! pair third- and second-from-last. An empty string means the symbol is
//! unknown at that venue.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;

use crate::errors::MarketDataError;
use crate::models::{Quote, RawQuote, Venue};
use crate::provider::http::{build_client, cache_buster, fetch_text};
use crate::provider::QuoteProvider;
use crate::registry::RecordValidator;

const BASE_URL: &str = "https://hq.sinajs.cn/list=";
const REFERER: &str = "https://finance.sina.com.cn/";
const PROVIDER_ID: &str = "SINA";

lazy_static! {
    static ref ASSIGNMENT: Regex =
        Regex::new(r#"hq_str_([a-z]{2}\d+)\s*=\s*"([^"]*)""#).expect("static pattern");
}

/// Sina quote client.
pub struct SinaProvider {
    client: Client,
    validator: RecordValidator,
}

impl SinaProvider {
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

impl Default for SinaProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn symbol(code: &str, venue: Venue) -> String {
    format!("{}{}", venue.prefix(), code.trim())
}

fn parse_field(field: Option<&&str>) -> Option<f64> {
    field.and_then(|s| s.trim().parse::<f64>().ok())
}

/// Parse a Sina quote script for `symbol` (e.g. "sh510300").
pub fn parse_quote(body: &str, symbol: &str, code: &str) -> Result<RawQuote, MarketDataError> {
    let payload = ASSIGNMENT
        .captures_iter(body)
        .find(|caps| &caps[1] == symbol)
        .map(|caps| caps[2].to_string())
        .ok_or_else(|| {
            MarketDataError::malformed(PROVIDER_ID, format!("no hq_str_{} assignment", symbol))
        })?;

    if payload.trim().len() < 5 {
        return Err(MarketDataError::not_found(PROVIDER_ID, code));
    }

    let fields: Vec<&str> = payload.split(',').collect();
    if fields.len() < 4 {
        return Err(MarketDataError::malformed(
            PROVIDER_ID,
            format!("expected at least 4 fields, got {}", fields.len()),
        ));
    }

    let price = parse_field(fields.get(3)).unwrap_or(f64::NAN);
    let previous_close = parse_field(fields.get(2)).filter(|p| p.is_finite() && *p > 0.0);
    let change_pct = previous_close.map(|pc| price / pc - 1.0);

    let time = if fields.len() >= 3 {
        let date = fields[fields.len() - 3].trim();
        let time = fields[fields.len() - 2].trim();
        if !date.is_empty() && !time.is_empty() {
            Some(format!("{} {}", date, time))
        } else {
            None
        }
    } else {
        None
    };

    Ok(RawQuote {
        name: fields[0].trim().to_string(),
        price,
        previous_close,
        change_pct,
        time,
    })
}

#[async_trait]
impl QuoteProvider for SinaProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quote(&self, code: &str, venue: Venue) -> Result<Quote, MarketDataError> {
        let symbol = symbol(code, venue);
        let url = format!("{}{}&_={}", BASE_URL, symbol, cache_buster());
        let body = fetch_text(&self.client, PROVIDER_ID, code, &url, Some(REFERER)).await?;
        let raw = parse_quote(&body, &symbol, code)?;
        self.validator.validate_quote(PROVIDER_ID, code, venue, raw)
    }
}
