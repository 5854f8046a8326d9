//! Venue guessing for bare six-digit instrument codes.

use crate::models::Venue;

/// Leading digits of codes listed in Shanghai (main board, funds, B shares).
const SHANGHAI_LEADING_DIGITS: [char; 3] = ['5', '6', '9'];

/// Guess the venue of a bare instrument code.
///
/// Codes starting with 5, 6 or 9 are Shanghai listings; everything else,
/// including the reserved `16` LOF range, defaults to Shenzhen.
pub fn guess_venue(code: &str) -> Venue {
    match code.trim().chars().next() {
        Some(c) if SHANGHAI_LEADING_DIGITS.contains(&c) => Venue::Shanghai,
        _ => Venue::Shenzhen,
    }
}

/// Venues to try for a code, best guess first.
pub fn venue_candidates(code: &str) -> [Venue; 2] {
    let primary = guess_venue(code);
    [primary, primary.alternate()]
}
