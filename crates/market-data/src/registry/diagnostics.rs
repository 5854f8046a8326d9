//! Attempt tracking for quote resolution diagnostics.

use crate::models::{ProviderId, Venue};

/// Outcome of a single provider/venue attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Attempt failed; carries the error tag and message.
    Failed { tag: &'static str, message: String },
    /// Venue was not tried because an earlier venue said to move on.
    Skipped { reason: String },
}

/// Record of a single provider attempt during a quote fetch.
#[derive(Clone, Debug)]
pub struct ProviderAttempt {
    pub provider_id: ProviderId,
    pub venue: Venue,
    pub outcome: AttemptOutcome,
}

/// Ordered log of every attempt made while resolving one quote.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, provider_id: ProviderId, venue: Venue) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            venue,
            outcome: AttemptOutcome::Success,
        });
    }

    pub fn record_error(
        &mut self,
        provider_id: ProviderId,
        venue: Venue,
        tag: &'static str,
        message: String,
    ) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            venue,
            outcome: AttemptOutcome::Failed { tag, message },
        });
    }

    pub fn record_skip(&mut self, provider_id: ProviderId, venue: Venue, reason: impl Into<String>) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            venue,
            outcome: AttemptOutcome::Skipped {
                reason: reason.into(),
            },
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| {
                let target = format!("{}@{}", a.provider_id, a.venue.prefix());
                match &a.outcome {
                    AttemptOutcome::Success => format!("{}: SUCCESS", target),
                    AttemptOutcome::Failed { tag, .. } => format!("{}: {}", target, tag),
                    AttemptOutcome::Skipped { reason } => {
                        format!("{}: SKIPPED ({})", target, reason)
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn has_success(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| a.outcome == AttemptOutcome::Success)
    }

    /// The provider/venue pair that succeeded, if any.
    pub fn winner(&self) -> Option<(&ProviderId, Venue)> {
        self.attempts
            .iter()
            .find(|a| a.outcome == AttemptOutcome::Success)
            .map(|a| (&a.provider_id, a.venue))
    }

    pub fn errors(&self) -> Vec<(&ProviderId, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Failed { message, .. } => Some((&a.provider_id, message.as_str())),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_summary_in_attempt_order() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(
            Cow::Borrowed("SINA"),
            Venue::Shanghai,
            "SOURCE_TIMEOUT",
            "Timeout".to_string(),
        );
        diag.record_success(Cow::Borrowed("EASTMONEY"), Venue::Shanghai);

        assert_eq!(
            diag.summary(),
            "SINA@sh: SOURCE_TIMEOUT -> EASTMONEY@sh: SUCCESS"
        );
        assert!(diag.has_success());
        assert_eq!(diag.winner().map(|(p, _)| p.as_ref()), Some("EASTMONEY"));
        assert_eq!(diag.errors().len(), 1);
    }

    #[test]
    fn test_empty_diagnostics() {
        let diag = FetchDiagnostics::new();
        assert!(!diag.has_success());
        assert_eq!(diag.summary(), "");
    }
}
