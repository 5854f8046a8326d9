/// Classification for fallback policy.
///
/// Used by the quote resolver to decide what to try after a source failure.
///
/// # Behavior Summary
///
/// | Class | Try alternate venue? | Try next provider? |
/// |-------|----------------------|--------------------|
/// | `NextVenue` | Yes | Yes (once venues are exhausted) |
/// | `NextProvider` | No | Yes |
/// | `Never` | No | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The payload was empty, malformed, or the call timed out.
    /// The venue guess may be wrong, so the same provider is asked again
    /// with the alternate venue before moving on.
    NextVenue,

    /// The provider itself refuses service (rate limited).
    /// Asking it again with another venue would only burn more quota.
    NextProvider,

    /// Terminal error - the request cannot succeed on any source.
    Never,
}
