//! Shared HTTP plumbing for the concrete data sources.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;
use reqwest::{Client, StatusCode};

use crate::errors::MarketDataError;

/// Transport-level ceiling. The sequencer enforces the per-call timeout; this
/// only guards against a connection that never closes.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Build the HTTP client shared by all sources.
pub fn build_client() -> Client {
    Client::builder()
        .timeout(CLIENT_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Millisecond timestamp appended to URLs so intermediaries never serve a
/// cached payload.
pub fn cache_buster() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

/// GET `url` and return the body as text.
///
/// Status mapping: 404 is `SourceNotFound`, 429 is `RateLimited`, any other
/// non-success status is `ProviderError`. Transport timeouts become
/// `SourceTimeout`.
pub async fn fetch_text(
    client: &Client,
    provider: &str,
    code: &str,
    url: &str,
    referer: Option<&str>,
) -> Result<String, MarketDataError> {
    debug!("{} request: {}", provider, url);

    let mut request = client.get(url);
    if let Some(referer) = referer {
        request = request.header(reqwest::header::REFERER, referer);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::SourceTimeout {
                provider: provider.to_string(),
                code: code.to_string(),
            }
        } else {
            MarketDataError::Network(e)
        }
    })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(MarketDataError::not_found(provider, code));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {}", status),
        });
    }

    response.text().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::SourceTimeout {
                provider: provider.to_string(),
                code: code.to_string(),
            }
        } else {
            MarketDataError::malformed(provider, format!("unreadable body: {}", e))
        }
    })
}
