//! Metrics for store observability.
//!
//! The runtime records through the [`metrics`] facade only; installing an
//! exporter (Prometheus or otherwise) is the host application's job. Call
//! [`register_metrics`] once after installing a recorder to attach
//! descriptions.
//!
//! | name | kind | labels |
//! |------|------|--------|
//! | `store_dispatch_total` | counter | `store`, `outcome` |
//! | `store_drained_actions_total` | counter | `store`, `outcome` |
//! | `store_dispatch_duration_seconds` | histogram | `store` |
//! | `store_reentrant_dispatch_total` | counter | `store`, `policy` |
//! | `store_subscribers` | gauge | `store` |

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};

/// `dispatch` calls by outcome (`applied`, `failed`, `queued`, `rejected`)
///
/// Each call is counted exactly once; what later happens to a queued action
/// is recorded under [`DRAINED_TOTAL`].
pub const DISPATCH_TOTAL: &str = "store_dispatch_total";

/// Queued actions run after a notification round (`applied`, `dropped`)
pub const DRAINED_TOTAL: &str = "store_drained_actions_total";

/// Time spent in transition plus notification
pub const DISPATCH_DURATION: &str = "store_dispatch_duration_seconds";

/// Dispatches issued from inside an observer
pub const REENTRANT_DISPATCH_TOTAL: &str = "store_reentrant_dispatch_total";

/// Currently registered observers
pub const SUBSCRIBERS: &str = "store_subscribers";

/// Outcome label values for [`DISPATCH_TOTAL`] and [`DRAINED_TOTAL`]
pub mod outcome {
    /// Transition succeeded and observers were notified
    pub const APPLIED: &str = "applied";
    /// Reducer returned an error; state unchanged
    pub const FAILED: &str = "failed";
    /// Re-entrant dispatch appended to the queue
    pub const QUEUED: &str = "queued";
    /// Re-entrant dispatch refused
    pub const REJECTED: &str = "rejected";
    /// Queued action whose transition failed during draining
    pub const DROPPED: &str = "dropped";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        DISPATCH_TOTAL,
        "Total number of dispatched actions, labelled by outcome"
    );
    describe_counter!(
        DRAINED_TOTAL,
        "Re-entrant actions run from the queue, labelled by outcome"
    );
    describe_histogram!(
        DISPATCH_DURATION,
        Unit::Seconds,
        "Time spent applying a transition and notifying observers"
    );
    describe_counter!(
        REENTRANT_DISPATCH_TOTAL,
        "Dispatches issued from inside an observer callback"
    );
    describe_gauge!(SUBSCRIBERS, "Number of observers currently registered");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_without_recorder_is_noop() {
        // No recorder installed: describing must not panic.
        register_metrics();
        register_metrics();
    }

    #[test]
    fn test_duration_metric_uses_seconds_suffix() {
        assert!(DISPATCH_DURATION.ends_with("_seconds"));
    }
}
