//! # Unistore Runtime
//!
//! Runtime implementation for Unistore.
//!
//! This crate provides the [`Store`]: the single owner of application state,
//! the dispatch entry point and the subscription registry.
//!
//! ## Core Components
//!
//! - **Store**: Holds the current snapshot and mediates every change through actions
//! - **Subscriptions**: Observers notified synchronously after each successful dispatch
//! - **Re-entrancy handling**: Dispatches issued from observers are queued or rejected
//!
//! ## Example
//!
//! ```ignore
//! use unistore_runtime::Store;
//!
//! let store = Store::new(counter_reducer);
//!
//! let subscription = store.subscribe({
//!     let store = store.clone();
//!     move || println!("count is now {}", store.state().counter)
//! });
//!
//! store.dispatch(AnyAction::new("INCREMENT")?)?;
//! subscription.unsubscribe();
//! ```

/// Metric names and descriptions for store observability
pub mod metrics;

/// Store runtime
pub mod store;

mod subscription;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors returned by [`Store::dispatch`](crate::Store::dispatch)
    ///
    /// The store's state is unchanged whenever one of these is returned.
    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum DispatchError<E> {
        /// The reducer could not compute the next state
        ///
        /// The store keeps its pre-dispatch state and no observer is notified.
        #[error("State transition failed: {0}")]
        Transition(E),

        /// A dispatch was issued from inside an observer while the store
        /// runs with [`ReentrancyPolicy::Reject`](crate::ReentrancyPolicy::Reject)
        #[error("Dispatch called while another dispatch is notifying observers")]
        Reentrant,

        /// The re-entrant dispatch queue is full
        #[error("Re-entrant dispatch queue is full ({0} actions pending)")]
        QueueFull(usize),
    }

    impl<E> DispatchError<E> {
        /// The reducer's error, if this is a transition failure
        #[must_use]
        pub fn into_transition(self) -> Option<E> {
            match self {
                Self::Transition(error) => Some(error),
                Self::Reentrant | Self::QueueFull(_) => None,
            }
        }
    }
}

pub use error::DispatchError;
pub use store::{Dispatched, Store};
pub use subscription::{Subscription, SubscriptionId};

/// What a store does with a dispatch issued from inside one of its observers
///
/// Only dispatches made on the thread that is currently notifying are
/// re-entrant; dispatches from other threads wait for the current cycle to
/// finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReentrancyPolicy {
    /// Append the action to a FIFO queue drained once the current
    /// notification round completes
    #[default]
    Queue,
    /// Refuse with [`DispatchError::Reentrant`]
    Reject,
}

impl ReentrancyPolicy {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Reject => "reject",
        }
    }
}

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use unistore_runtime::{ReentrancyPolicy, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_name("cart")
///     .with_reentrancy(ReentrancyPolicy::Reject);
///
/// assert_eq!(config.name, "cart");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Label used in logs and metrics
    pub name: String,
    /// Behaviour of dispatches issued from observers
    pub reentrancy: ReentrancyPolicy,
    /// Maximum number of queued re-entrant actions
    pub max_queued_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        reentrancy: ReentrancyPolicy,
        max_queued_actions: usize,
    ) -> Self {
        Self {
            name: name.into(),
            reentrancy,
            max_queued_actions,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the re-entrancy policy
    #[must_use]
    pub const fn with_reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.reentrancy = policy;
        self
    }

    /// Set the re-entrant queue bound
    #[must_use]
    pub const fn with_max_queued_actions(mut self, max: usize) -> Self {
        self.max_queued_actions = max;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            reentrancy: ReentrancyPolicy::Queue,
            max_queued_actions: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StoreConfig::default();

        assert_eq!(config.name, "store");
        assert_eq!(config.reentrancy, ReentrancyPolicy::Queue);
        assert_eq!(config.max_queued_actions, 1024);
    }

    #[test]
    fn test_config_builders() {
        let config = StoreConfig::new("a", ReentrancyPolicy::Queue, 1)
            .with_name("b")
            .with_reentrancy(ReentrancyPolicy::Reject)
            .with_max_queued_actions(8);

        assert_eq!(config.name, "b");
        assert_eq!(config.reentrancy.as_str(), "reject");
        assert_eq!(config.max_queued_actions, 8);
    }

    #[test]
    fn test_dispatch_error_display() {
        let error: DispatchError<String> = DispatchError::Transition("bad payload".into());
        assert_eq!(error.to_string(), "State transition failed: bad payload");
        assert_eq!(error.into_transition(), Some("bad payload".to_string()));

        let error: DispatchError<String> = DispatchError::QueueFull(3);
        assert!(error.to_string().contains('3'));
        assert_eq!(error.into_transition(), None);
    }
}
