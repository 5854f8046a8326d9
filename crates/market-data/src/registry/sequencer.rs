//! Request sequencer.
//!
//! At most one outbound call per namespace is in flight at any time. Calls in
//! the same namespace start in the order they were submitted; each waits for
//! every earlier call to settle or time out. In [`SequencerMode::PerKind`]
//! each [`DataKind`] is its own namespace, in [`SequencerMode::Global`] all
//! kinds share one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::errors::MarketDataError;
use crate::models::DataKind;

/// How outbound calls are grouped into serial namespaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequencerMode {
    /// One queue per data kind; different kinds run concurrently.
    #[default]
    PerKind,
    /// One queue for everything.
    Global,
}

/// FIFO gate for outbound data source calls.
///
/// `tokio::sync::Mutex` hands the lock out in request order, which gives the
/// queue its ordering.
pub struct RequestSequencer {
    mode: SequencerMode,
    lanes: HashMap<DataKind, Arc<Mutex<()>>>,
    next_call_id: AtomicU64,
}

impl RequestSequencer {
    pub fn new(mode: SequencerMode) -> Self {
        let lanes = match mode {
            SequencerMode::PerKind => DataKind::ALL
                .iter()
                .map(|kind| (*kind, Arc::new(Mutex::new(()))))
                .collect(),
            SequencerMode::Global => {
                let shared = Arc::new(Mutex::new(()));
                DataKind::ALL
                    .iter()
                    .map(|kind| (*kind, Arc::clone(&shared)))
                    .collect()
            }
        };

        Self {
            mode,
            lanes,
            next_call_id: AtomicU64::new(1),
        }
    }

    pub fn mode(&self) -> SequencerMode {
        self.mode
    }

    /// Run `call` once every earlier call in the same namespace has settled.
    ///
    /// The timeout covers the call itself, not the time spent queued. A call
    /// that exceeds it resolves to [`MarketDataError::SourceTimeout`] and is
    /// not retried.
    pub async fn run<T, F, Fut>(
        &self,
        kind: DataKind,
        provider: &str,
        code: &str,
        timeout: Duration,
        call: F,
    ) -> Result<T, MarketDataError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let call_id = self.next_call_id.fetch_add(1, Ordering::Relaxed);
        let lane = self.lane(kind);

        let _guard = lane.lock().await;
        debug!(
            "[call {}] {} {} {} started",
            call_id,
            kind.as_str(),
            provider,
            code
        );

        match tokio::time::timeout(timeout, call()).await {
            Ok(result) => {
                debug!(
                    "[call {}] {} {} {} settled (ok: {})",
                    call_id,
                    kind.as_str(),
                    provider,
                    code,
                    result.is_ok()
                );
                result
            }
            Err(_) => {
                warn!(
                    "[call {}] {} {} {} timed out after {:?}",
                    call_id,
                    kind.as_str(),
                    provider,
                    code,
                    timeout
                );
                Err(MarketDataError::SourceTimeout {
                    provider: provider.to_string(),
                    code: code.to_string(),
                })
            }
        }
    }

    fn lane(&self, kind: DataKind) -> Arc<Mutex<()>> {
        match self.lanes.get(&kind) {
            Some(lane) => Arc::clone(lane),
            // every kind is populated in new()
            None => Arc::new(Mutex::new(())),
        }
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new(SequencerMode::default())
    }
}
