//! Instrument heuristics shared by every provider.
//!
//! Providers receive bare six-digit codes. Which exchange a code trades on,
//! and how a provider scales its prices, are both guessed here once instead
//! of in each client, so they can be tested without any network code.

mod magnitude;
mod venue_rules;

pub use magnitude::normalize_magnitude;
pub use venue_rules::{guess_venue, venue_candidates};
