//! Price magnitude normalization for providers that publish scaled integers.

/// Lower bound (exclusive) above which a raw price is assumed scaled by 1000.
const THOUSANDS_SCALED_FLOOR: f64 = 1_000.0;

/// Lower bound (inclusive) from which a raw price is assumed scaled by 100.
const HUNDREDS_SCALED_FLOOR: f64 = 100_000.0;

/// Undo provider-side integer scaling of a price.
///
/// Values in (1000, 100000) are divided by 1000, values of 100000 and above
/// are divided by 100, anything else is returned unchanged. Non-finite input
/// is passed through for the validator to reject.
pub fn normalize_magnitude(raw: f64) -> f64 {
    if !raw.is_finite() {
        return raw;
    }
    if raw >= HUNDREDS_SCALED_FLOOR {
        raw / 100.0
    } else if raw > THOUSANDS_SCALED_FLOOR {
        raw / 1_000.0
    } else {
        raw
    }
}
