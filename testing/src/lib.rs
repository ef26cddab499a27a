//! # Unistore Testing
//!
//! Testing utilities and helpers for Unistore.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`RecordingObserver`]: An observer factory that logs every notification
//! - [`properties`]: proptest strategies and a reference fold for property tests
//!
//! ## Example
//!
//! ```ignore
//! use unistore_testing::RecordingObserver;
//! use unistore_runtime::Store;
//!
//! #[test]
//! fn test_observers_notified_in_order() {
//!     let store = Store::new(CounterReducer);
//!     let recorder = RecordingObserver::new();
//!
//!     let _a = store.subscribe(recorder.observer("a"));
//!     let _b = store.subscribe(recorder.observer("b"));
//!     store.dispatch(CounterAction::Increment)?;
//!
//!     assert_eq!(recorder.calls(), ["a", "b"]);
//! }
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Observer doubles
pub mod observers {
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records observer invocations, in order, under caller-chosen labels
    ///
    /// Clones share the same log.
    ///
    /// # Example
    ///
    /// ```
    /// use unistore_testing::RecordingObserver;
    ///
    /// let recorder = RecordingObserver::new();
    /// let first = recorder.observer("first");
    /// let second = recorder.observer("second");
    ///
    /// second();
    /// first();
    /// second();
    ///
    /// assert_eq!(recorder.calls(), ["second", "first", "second"]);
    /// assert_eq!(recorder.count("second"), 2);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct RecordingObserver {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingObserver {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// An observer that appends `label` to the log each time it runs
        pub fn observer(&self, label: impl Into<String>) -> impl Fn() + Send + Sync + 'static {
            let log = Arc::clone(&self.log);
            let label = label.into();
            move || log.lock().push(label.clone())
        }

        /// A sink that appends whatever it is handed, e.g. rendered frames
        pub fn sink(&self) -> impl Fn(String) + Send + Sync + 'static {
            let log = Arc::clone(&self.log);
            move |entry| log.lock().push(entry)
        }

        /// All recorded invocations, oldest first
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.log.lock().clone()
        }

        /// Number of invocations recorded under `label`
        #[must_use]
        pub fn count(&self, label: &str) -> usize {
            self.log.lock().iter().filter(|call| *call == label).count()
        }

        /// Total number of invocations
        #[must_use]
        pub fn total(&self) -> usize {
            self.log.lock().len()
        }

        /// Forget everything recorded so far
        pub fn clear(&self) {
            self.log.lock().clear();
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use serde_json::Value;
    use std::fmt::Debug;
    use unistore_core::{AnyAction, Reducer};

    /// Sequences of up to `max_len` actions drawn from `choices`
    pub fn action_sequence<A>(choices: Vec<A>, max_len: usize) -> impl Strategy<Value = Vec<A>>
    where
        A: Clone + Debug + 'static,
    {
        proptest::collection::vec(proptest::sample::select(choices), 0..=max_len)
    }

    /// Dynamic actions whose discriminant is never one of `known`
    ///
    /// Useful for asserting that unrecognized actions are no-ops.
    pub fn unknown_action(known: &'static [&'static str]) -> impl Strategy<Value = AnyAction> {
        ("[A-Za-z][A-Za-z0-9_/]{0,23}", proptest::option::of(any::<i64>()))
            .prop_filter("discriminant must be unknown", move |(action_type, _)| {
                !known.contains(&action_type.as_str())
            })
            .prop_filter_map("discriminant must be valid", |(action_type, payload)| {
                match payload {
                    Some(payload) => AnyAction::with_payload(action_type, Value::from(payload)).ok(),
                    None => AnyAction::new(action_type).ok(),
                }
            })
    }

    /// Reference left-fold of `reducer` over `actions`, starting at `initial`
    ///
    /// # Errors
    ///
    /// Returns the first transition error.
    pub fn fold<R>(reducer: &R, initial: R::State, actions: &[R::Action]) -> Result<R::State, R::Error>
    where
        R: Reducer,
    {
        actions
            .iter()
            .try_fold(initial, |state, action| reducer.reduce(&state, action))
    }
}

// Re-export commonly used items
pub use observers::RecordingObserver;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::convert::Infallible;
    use unistore_core::{AnyAction, Reducer, reducer_fn};

    const KNOWN: &[&str] = &["INCREMENT", "DECREMENT"];

    fn counter() -> impl Reducer<State = i64, Action = AnyAction, Error = Infallible> {
        reducer_fn(|count: &i64, action: &AnyAction| match action.action_type() {
            "INCREMENT" => count + 1,
            "DECREMENT" => count - 1,
            _ => *count,
        })
    }

    #[test]
    fn test_recording_observer_clear() {
        let recorder = RecordingObserver::new();
        let observer = recorder.observer("x");

        observer();
        observer();
        assert_eq!(recorder.total(), 2);

        recorder.clear();
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_sink_shares_log_with_observers() {
        let recorder = RecordingObserver::new();
        let sink = recorder.sink();
        let observer = recorder.observer("tick");

        sink("frame 1".to_string());
        observer();
        sink("frame 2".to_string());

        assert_eq!(recorder.calls(), ["frame 1", "tick", "frame 2"]);
    }

    #[test]
    fn test_fold_matches_manual_application() {
        let reducer = counter();
        let actions: Vec<AnyAction> = ["INCREMENT", "INCREMENT", "DECREMENT"]
            .into_iter()
            .filter_map(|t| AnyAction::new(t).ok())
            .collect();

        assert_eq!(properties::fold(&reducer, 0, &actions), Ok(1));
    }

    proptest! {
        #[test]
        fn prop_unknown_actions_avoid_known_types(action in properties::unknown_action(KNOWN)) {
            prop_assert!(!KNOWN.contains(&action.action_type()));
            prop_assert_eq!(counter().reduce(&3, &action), Ok(3));
        }

        #[test]
        fn prop_action_sequence_respects_bounds(actions in properties::action_sequence(vec![1_u8, 2, 3], 5)) {
            prop_assert!(actions.len() <= 5);
            prop_assert!(actions.iter().all(|a| (1..=3).contains(a)));
        }
    }
}
