//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action, left to right
//! - **`scope_reducer`**: Focus a reducer on a subset of state
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use unistore_core::{combine_reducers, reducer_fn, Reducer};
//! use unistore_core::composition::BoxedReducer;
//! use std::convert::Infallible;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct AppState {
//!     count: i32,
//!     touched: bool,
//! }
//!
//! let counter = reducer_fn(|s: &AppState, step: &i32| AppState { count: s.count + step, ..s.clone() });
//! let touch = reducer_fn(|s: &AppState, _: &i32| AppState { touched: true, ..s.clone() });
//!
//! let reducers: Vec<BoxedReducer<AppState, i32, Infallible>> = vec![Box::new(counter), Box::new(touch)];
//! let combined = combine_reducers(reducers);
//! let next = combined.reduce(&AppState::default(), &2);
//! assert_eq!(next, Ok(AppState { count: 2, touched: true }));
//! ```

use crate::reducer::Reducer;

/// A boxed reducer usable inside [`CombinedReducer`]
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Error = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer receives the state produced by the previous one. If any of
/// them fails, the whole transition fails and no intermediate state escapes.
/// With no reducers the input state is returned unchanged.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: Clone,
{
    CombinedReducer { reducers }
}

/// Reducer returned by [`combine_reducers`]
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: Clone,
{
    type State = S;
    type Action = A;
    type Error = E;

    fn reduce(&self, state: &S, action: &A) -> Result<S, E> {
        let mut current: Option<S> = None;

        for reducer in &self.reducers {
            let base = current.as_ref().unwrap_or(state);
            current = Some(reducer.reduce(base, action)?);
        }

        Ok(current.unwrap_or_else(|| state.clone()))
    }

    /// The first state declared along the chain
    fn initial_state(&self) -> Option<S> {
        self.reducers.iter().find_map(|reducer| reducer.initial_state())
    }
}

/// Focuses a reducer on a part of a larger state.
///
/// `get_state` projects the sub-state out of the parent; `set_state` builds
/// a new parent from the old one and the next sub-state.
///
/// # Example
///
/// ```
/// use unistore_core::{reducer_fn, scope_reducer, Reducer};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Parent {
///     counter: i64,
///     label: &'static str,
/// }
///
/// let counter = reducer_fn(|count: &i64, step: &i64| count + step);
/// let scoped = scope_reducer(
///     counter,
///     |parent: &Parent| &parent.counter,
///     |parent: &Parent, counter| Parent { counter, ..parent.clone() },
/// );
///
/// let next = scoped.reduce(&Parent { counter: 1, label: "a" }, &2);
/// assert_eq!(next, Ok(Parent { counter: 3, label: "a" }));
/// ```
pub const fn scope_reducer<S, SubS, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&S, SubS) -> S,
) -> ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
    }
}

/// Reducer returned by [`scope_reducer`]
pub struct ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&S, SubS) -> S,
}

impl<S, SubS, R> Reducer for ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS>,
{
    type State = S;
    type Action = R::Action;
    type Error = R::Error;

    fn reduce(&self, state: &S, action: &R::Action) -> Result<S, R::Error> {
        let sub_state = (self.get_state)(state);
        let next_sub_state = self.reducer.reduce(sub_state, action)?;
        Ok((self.set_state)(state, next_sub_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AnyAction;
    use crate::reducer::{reducer_fn, try_reducer_fn};
    use crate::slice::Slice;
    use proptest::prelude::*;
    use std::convert::Infallible;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        SetName(String),
    }

    fn counter() -> BoxedReducer<TestState, TestAction, Infallible> {
        Box::new(reducer_fn(|state: &TestState, action: &TestAction| {
            match action {
                TestAction::Increment => TestState {
                    counter: state.counter + 1,
                    ..state.clone()
                },
                TestAction::SetName(_) => state.clone(),
            }
        }))
    }

    fn naming() -> BoxedReducer<TestState, TestAction, Infallible> {
        Box::new(reducer_fn(|state: &TestState, action: &TestAction| {
            match action {
                TestAction::SetName(name) => TestState {
                    name: name.clone(),
                    ..state.clone()
                },
                TestAction::Increment => state.clone(),
            }
        }))
    }

    #[test]
    fn test_combine_reducers() {
        let combined = combine_reducers(vec![counter(), naming()]);
        let state = TestState::default();

        let state = combined.reduce(&state, &TestAction::Increment).unwrap_or_default();
        assert_eq!(state.counter, 1);

        let state = combined
            .reduce(&state, &TestAction::SetName("Alice".to_string()))
            .unwrap_or_default();
        assert_eq!(state.counter, 1);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_combine_empty_returns_input() {
        let combined: CombinedReducer<TestState, TestAction, Infallible> = combine_reducers(vec![]);
        let state = TestState {
            counter: 4,
            name: "x".into(),
        };

        assert!(combined.is_empty());
        assert_eq!(combined.reduce(&state, &TestAction::Increment), Ok(state));
    }

    #[test]
    fn test_combine_stops_on_first_error() {
        let failing: BoxedReducer<i32, i32, String> =
            Box::new(try_reducer_fn(|_: &i32, _: &i32| Err("rejected".to_string())));
        let adder: BoxedReducer<i32, i32, String> =
            Box::new(try_reducer_fn(|s: &i32, a: &i32| Ok(s + a)));

        let combined = combine_reducers(vec![adder, failing]);

        assert_eq!(combined.len(), 2);
        assert_eq!(combined.reduce(&1, &1), Err("rejected".to_string()));
    }

    #[test]
    fn test_combine_takes_first_declared_state() {
        let plain: BoxedReducer<i64, AnyAction, Infallible> =
            Box::new(reducer_fn(|s: &i64, _: &AnyAction| *s));
        let slice: BoxedReducer<i64, AnyAction, Infallible> =
            Box::new(Slice::builder("n", 3_i64).case("bump", |s: &i64, _| s + 1).build());

        assert_eq!(combine_reducers(vec![plain, slice]).initial_state(), Some(3));
        assert_eq!(
            combine_reducers::<i64, AnyAction, Infallible>(vec![]).initial_state(),
            None
        );
    }

    #[test]
    fn test_scope_reducer() {
        let scoped = scope_reducer(
            reducer_fn(|count: &i32, action: &TestAction| match action {
                TestAction::Increment => count + 1,
                TestAction::SetName(_) => *count,
            }),
            |state: &TestState| &state.counter,
            |state: &TestState, counter| TestState {
                counter,
                ..state.clone()
            },
        );

        let state = TestState {
            counter: 41,
            name: "kept".into(),
        };
        let next = scoped.reduce(&state, &TestAction::Increment);

        assert_eq!(
            next,
            Ok(TestState {
                counter: 42,
                name: "kept".into()
            })
        );
        // Input snapshot untouched
        assert_eq!(state.counter, 41);
    }

    proptest! {
        #[test]
        fn prop_combined_chain_is_a_left_fold(
            start in -1000_i64..1000,
            steps in proptest::collection::vec(-50_i64..50, 0..8),
            action in -10_i64..10,
        ) {
            let reducers: Vec<BoxedReducer<i64, i64, Infallible>> = steps
                .iter()
                .map(|&step| -> BoxedReducer<i64, i64, Infallible> {
                    Box::new(reducer_fn(move |s: &i64, a: &i64| s + a + step))
                })
                .collect();
            let combined = combine_reducers(reducers);

            let expected = steps.iter().fold(start, |s, step| s + action + step);
            prop_assert_eq!(combined.reduce(&start, &action), Ok(expected));
        }
    }
}
