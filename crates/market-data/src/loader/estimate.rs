//! Live estimate loading. Absence is an expected outcome, not an error.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::models::{DataKind, EstimateSnapshot};
use crate::provider::EstimateProvider;
use crate::registry::RequestSequencer;

pub struct EstimateLoader {
    provider: Arc<dyn EstimateProvider>,
    sequencer: Arc<RequestSequencer>,
    timeout: Duration,
}

impl EstimateLoader {
    pub fn new(
        provider: Arc<dyn EstimateProvider>,
        sequencer: Arc<RequestSequencer>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            sequencer,
            timeout,
        }
    }

    /// The live estimate for `code`, or `None` when the source has none or fails.
    pub async fn load(&self, code: &str) -> Option<EstimateSnapshot> {
        let provider = &self.provider;
        match self
            .sequencer
            .run(DataKind::Estimate, provider.id(), code, self.timeout, || {
                provider.fetch_estimate(code)
            })
            .await
        {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!("No estimate for {} from '{}': {}", code, provider.id(), e);
                None
            }
        }
    }
}
