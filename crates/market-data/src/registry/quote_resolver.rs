//! Quote resolution across providers and venues.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::{FetchDiagnostics, RequestSequencer};
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{DataKind, ProviderId, Quote};
use crate::provider::QuoteProvider;
use crate::resolver::venue_candidates;

/// Tries quote providers in priority order, each against the guessed venue
/// and then the alternate one. The first valid quote wins; results are never
/// merged or cross-checked.
pub struct QuoteResolver {
    providers: Vec<Arc<dyn QuoteProvider>>,
    sequencer: Arc<RequestSequencer>,
    timeout: Duration,
}

impl QuoteResolver {
    /// `providers` must already be in priority order.
    pub fn new(
        providers: Vec<Arc<dyn QuoteProvider>>,
        sequencer: Arc<RequestSequencer>,
        timeout: Duration,
    ) -> Self {
        Self {
            providers,
            sequencer,
            timeout,
        }
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Resolve a quote for `code`.
    pub async fn resolve(&self, code: &str) -> Result<Quote, MarketDataError> {
        self.resolve_with_diagnostics(code).await.0
    }

    /// Resolve a quote for `code`, also returning every attempt made.
    ///
    /// Fallback per error class:
    /// 1. `NextVenue`: try the same provider on the next venue
    /// 2. `NextProvider`: skip the provider's remaining venues
    /// 3. `Never`: stop and return the error
    pub async fn resolve_with_diagnostics(
        &self,
        code: &str,
    ) -> (Result<Quote, MarketDataError>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let venues = venue_candidates(code);

        if self.providers.is_empty() {
            warn!("No quote providers configured, cannot resolve {}", code);
        }

        for provider in &self.providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            let mut remaining = venues.iter();

            while let Some(&venue) = remaining.next() {
                debug!(
                    "Fetching quote for {} from '{}' at {}",
                    code,
                    provider_id,
                    venue.prefix()
                );

                let result = self
                    .sequencer
                    .run(DataKind::Quote, provider.id(), code, self.timeout, || {
                        provider.fetch_quote(code, venue)
                    })
                    .await;

                match result {
                    Ok(quote) => {
                        diagnostics.record_success(provider_id.clone(), venue);
                        info!(
                            "Quote for {} from '{}' at {}: {}",
                            code,
                            provider_id,
                            venue.prefix(),
                            quote.price
                        );
                        return (Ok(quote), diagnostics);
                    }
                    Err(e) => {
                        diagnostics.record_error(
                            provider_id.clone(),
                            venue,
                            e.tag(),
                            e.to_string(),
                        );

                        match e.retry_class() {
                            RetryClass::NextVenue => {
                                debug!(
                                    "'{}' failed for {} at {}: {}",
                                    provider_id,
                                    code,
                                    venue.prefix(),
                                    e
                                );
                            }
                            RetryClass::NextProvider => {
                                info!(
                                    "'{}' failed with {}, trying next provider",
                                    provider_id, e
                                );
                                for &skipped in remaining.by_ref() {
                                    diagnostics.record_skip(
                                        provider_id.clone(),
                                        skipped,
                                        e.tag(),
                                    );
                                }
                            }
                            RetryClass::Never => {
                                info!("Terminal error from '{}': {}, not retrying", provider_id, e);
                                return (Err(e), diagnostics);
                            }
                        }
                    }
                }
            }
        }

        let attempts = diagnostics.summary();
        warn!("All quote sources exhausted for {}: {}", code, attempts);
        (
            Err(MarketDataError::AllSourcesExhausted {
                code: code.to_string(),
                attempts,
            }),
            diagnostics,
        )
    }
}
