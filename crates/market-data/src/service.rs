//! Market data service: sources behind caches, with stale fallback.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::cache::{MarketDataCache, SharedMarketDataCache};
use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::loader::{EstimateLoader, NavSeriesLoader};
use crate::models::{EstimateSnapshot, NavData, Quote};
use crate::provider::eastmoney::EastMoneyProvider;
use crate::provider::fundgz::FundGzProvider;
use crate::provider::http::build_client;
use crate::provider::pingzhong::PingZhongProvider;
use crate::provider::sina::SinaProvider;
use crate::provider::{EstimateProvider, NavTrendProvider, QuoteProvider};
use crate::registry::{FetchDiagnostics, QuoteResolver, RequestSequencer};

/// A value plus whether it came from an expired cache entry after the
/// source failed.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub stale: bool,
}

impl<T> Fetched<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            stale: false,
        }
    }

    pub fn stale(value: T) -> Self {
        Self { value, stale: true }
    }
}

/// Read access to market data for valuation.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// NAV history for `code`.
    async fn nav_data(&self, code: &str) -> Result<Fetched<NavData>, MarketDataError>;

    /// Live estimate for `code`; `None` when there is none.
    async fn estimate(&self, code: &str) -> Option<Fetched<EstimateSnapshot>>;

    /// Real-time quote for `code`.
    async fn quote(&self, code: &str) -> Result<Fetched<Quote>, MarketDataError>;
}

pub struct MarketDataService {
    quotes: QuoteResolver,
    nav: NavSeriesLoader,
    estimates: EstimateLoader,
    cache: SharedMarketDataCache,
}

impl MarketDataService {
    /// Build the service with the built-in HTTP sources.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        config.validate()?;

        let client = build_client();
        let quote_providers = config
            .quote_providers
            .iter()
            .map(|id| -> Result<Arc<dyn QuoteProvider>, MarketDataError> {
                match id.as_str() {
                    "SINA" => Ok(Arc::new(SinaProvider::with_client(client.clone()))),
                    "EASTMONEY" => Ok(Arc::new(EastMoneyProvider::with_client(client.clone()))),
                    other => Err(MarketDataError::Config(format!(
                        "unknown quote provider '{}'",
                        other
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Market data service: quote providers {:?}, timeout {:?}, sequencer {:?}",
            config.quote_providers,
            config.source_timeout(),
            config.sequencer_mode
        );

        Ok(Self::with_providers(
            config,
            quote_providers,
            Arc::new(PingZhongProvider::with_client(client.clone())),
            Arc::new(FundGzProvider::with_client(client)),
        ))
    }

    /// Build the service over arbitrary sources. Quote providers are used in
    /// the order given.
    pub fn with_providers(
        config: &MarketDataConfig,
        quote_providers: Vec<Arc<dyn QuoteProvider>>,
        nav_provider: Arc<dyn NavTrendProvider>,
        estimate_provider: Arc<dyn EstimateProvider>,
    ) -> Self {
        let sequencer = Arc::new(RequestSequencer::new(config.sequencer_mode));
        let timeout = config.source_timeout();

        Self {
            quotes: QuoteResolver::new(quote_providers, Arc::clone(&sequencer), timeout),
            nav: NavSeriesLoader::new(
                nav_provider,
                Arc::clone(&sequencer),
                timeout,
                config.timezone,
            ),
            estimates: EstimateLoader::new(estimate_provider, sequencer, timeout),
            cache: Arc::new(MarketDataCache::new(
                config.nav_ttl(),
                config.estimate_ttl(),
                config.quote_ttl(),
            )),
        }
    }

    pub fn cache(&self) -> &SharedMarketDataCache {
        &self.cache
    }

    /// Resolve a quote bypassing the cache, with every attempt recorded.
    pub async fn quote_with_diagnostics(
        &self,
        code: &str,
    ) -> (Result<Quote, MarketDataError>, FetchDiagnostics) {
        let (result, diagnostics) = self.quotes.resolve_with_diagnostics(code).await;
        if let Ok(quote) = &result {
            self.cache.quotes().insert(code, quote.clone());
        }
        (result, diagnostics)
    }
}

#[async_trait]
impl MarketDataSource for MarketDataService {
    async fn nav_data(&self, code: &str) -> Result<Fetched<NavData>, MarketDataError> {
        if let Some(data) = self.cache.nav().get_fresh(code) {
            debug!("NAV cache hit for {}", code);
            return Ok(Fetched::fresh(data));
        }

        match self.nav.load(code).await {
            Ok(data) => {
                self.cache.nav().insert(code, data.clone());
                Ok(Fetched::fresh(data))
            }
            Err(e) => match self.cache.nav().get_stale(code) {
                Some(data) => {
                    warn!("Serving stale NAV series for {}: {}", code, e);
                    Ok(Fetched::stale(data))
                }
                None => Err(e),
            },
        }
    }

    async fn estimate(&self, code: &str) -> Option<Fetched<EstimateSnapshot>> {
        if let Some(snapshot) = self.cache.estimates().get_fresh(code) {
            return Some(Fetched::fresh(snapshot));
        }

        match self.estimates.load(code).await {
            Some(snapshot) => {
                self.cache.estimates().insert(code, snapshot.clone());
                Some(Fetched::fresh(snapshot))
            }
            None => self.cache.estimates().get_stale(code).map(|snapshot| {
                warn!("Serving stale estimate for {}", code);
                Fetched::stale(snapshot)
            }),
        }
    }

    async fn quote(&self, code: &str) -> Result<Fetched<Quote>, MarketDataError> {
        if let Some(quote) = self.cache.quotes().get_fresh(code) {
            debug!("Quote cache hit for {}", code);
            return Ok(Fetched::fresh(quote));
        }

        match self.quotes.resolve(code).await {
            Ok(quote) => {
                self.cache.quotes().insert(code, quote.clone());
                Ok(Fetched::fresh(quote))
            }
            Err(e) => match self.cache.quotes().get_stale(code) {
                Some(quote) => {
                    warn!("Serving stale quote for {}: {}", code, e);
                    Ok(Fetched::stale(quote))
                }
                None => Err(e),
            },
        }
    }
}
