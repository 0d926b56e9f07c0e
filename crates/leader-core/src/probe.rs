//! Availability probing

/// Answers "is the server reachable and ready right now?".
///
/// Implementations issue a single check and never retry; connection-level
/// failures mean "not yet" and are reported as `false`, never as an error.
/// Retry policy belongs to [`crate::Poller`].
pub trait AvailabilityProbe {
    fn is_available(&self) -> bool;
}
