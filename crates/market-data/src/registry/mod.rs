//! Provider registry module.
//!
//! Orchestration for the data source clients:
//! - Record validation
//! - Per-namespace request sequencing with timeouts
//! - Quote resolution with provider and venue fallback
//! - Attempt diagnostics

mod diagnostics;
mod quote_resolver;
mod sequencer;
mod validator;

pub use diagnostics::{AttemptOutcome, FetchDiagnostics, ProviderAttempt};
pub use quote_resolver::QuoteResolver;
pub use sequencer::{RequestSequencer, SequencerMode};
pub use validator::{decimal_from_f64, RecordValidator, ValidationSeverity, ValidatorConfig};
