//! # Unistore Core
//!
//! Core traits and types for Unistore, a minimal unidirectional state container.
//!
//! This crate holds the pure half of the design. Nothing here owns state or
//! performs I/O; the `unistore-runtime` crate provides the `Store` that drives
//! these abstractions.
//!
//! ## Core Concepts
//!
//! - **State**: An immutable snapshot, replaced wholesale on every transition
//! - **Action**: A tagged value (discriminant + optional payload) describing an intent
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Slice**: A named bundle of initial state and case reducers keyed by action name
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - Pure transitions (no hidden I/O, no in-place mutation of the current snapshot)
//! - Unknown actions are no-ops, never errors
//!
//! ## Example
//!
//! ```
//! use unistore_core::{Action, Reducer};
//! use std::convert::Infallible;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct CounterState {
//!     counter: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Action for CounterAction {
//!     fn action_type(&self) -> &str {
//!         match self {
//!             Self::Increment => "INCREMENT",
//!             Self::Decrement => "DECREMENT",
//!         }
//!     }
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Error = Infallible;
//!
//!     fn reduce(&self, state: &CounterState, action: &CounterAction) -> Result<CounterState, Infallible> {
//!         Ok(match action {
//!             CounterAction::Increment => CounterState { counter: state.counter + 1 },
//!             CounterAction::Decrement => CounterState { counter: state.counter - 1 },
//!         })
//!     }
//! }
//!
//! let next = CounterReducer.reduce(&CounterState::default(), &CounterAction::Increment);
//! assert_eq!(next, Ok(CounterState { counter: 1 }));
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value;

/// Action module - tagged descriptions of intended state transitions
pub mod action;

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Slice pattern: named case reducers with namespaced action types
pub mod slice;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action) → State`.
///
/// They contain all business logic and are deterministic and testable.
/// A reducer never mutates the snapshot it is given; it builds the next
/// snapshot from it.
pub mod reducer {
    use std::convert::Infallible;
    use std::marker::PhantomData;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The snapshot type this reducer transitions
    /// - `Action`: The action type this reducer processes
    /// - `Error`: Failure type; use [`Infallible`] for reducers that cannot fail
    ///
    /// # Contract
    ///
    /// - Pure and deterministic: the same `(state, action)` pair always yields
    ///   the same result, with no observable side effect.
    /// - Total over every declared discriminant.
    /// - Returns a state equal to the input for unrecognized discriminants.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = AnyAction;
    ///     type Error = Infallible;
    ///
    ///     fn reduce(&self, state: &TodoState, action: &AnyAction) -> Result<TodoState, Infallible> {
    ///         match action.action_type() {
    ///             "todos/clear" => Ok(TodoState::default()),
    ///             _ => Ok(state.clone()),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The error returned when a transition cannot be computed
        type Error;

        /// Compute the next state from the current one and an action
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is well-tagged but cannot be
        /// applied (for example an undecodable payload). Callers must treat
        /// the current state as unchanged in that case.
        fn reduce(
            &self,
            state: &Self::State,
            action: &Self::Action,
        ) -> Result<Self::State, Self::Error>;

        /// The state this reducer declares as its starting point, if any
        ///
        /// Stores created without an explicit initial state start here.
        /// Returns `None` by default, leaving the choice to the caller.
        fn initial_state(&self) -> Option<Self::State> {
            None
        }
    }

    impl<R> Reducer for Box<R>
    where
        R: Reducer + ?Sized,
    {
        type State = R::State;
        type Action = R::Action;
        type Error = R::Error;

        fn reduce(
            &self,
            state: &Self::State,
            action: &Self::Action,
        ) -> Result<Self::State, Self::Error> {
            (**self).reduce(state, action)
        }

        fn initial_state(&self) -> Option<Self::State> {
            (**self).initial_state()
        }
    }

    /// Reducer built from an infallible closure. See [`reducer_fn`].
    pub struct FnReducer<F, S, A> {
        f: F,
        _phantom: PhantomData<fn(&S, &A) -> S>,
    }

    impl<F, S, A> Reducer for FnReducer<F, S, A>
    where
        F: Fn(&S, &A) -> S,
    {
        type State = S;
        type Action = A;
        type Error = Infallible;

        fn reduce(&self, state: &S, action: &A) -> Result<S, Infallible> {
            Ok((self.f)(state, action))
        }
    }

    /// Wrap a plain transition function as a [`Reducer`]
    ///
    /// # Example
    ///
    /// ```
    /// use unistore_core::reducer::{reducer_fn, Reducer};
    ///
    /// let double = reducer_fn(|state: &i64, _action: &()| state * 2);
    /// assert_eq!(double.reduce(&21, &()), Ok(42));
    /// ```
    pub const fn reducer_fn<S, A, F>(f: F) -> FnReducer<F, S, A>
    where
        F: Fn(&S, &A) -> S,
    {
        FnReducer {
            f,
            _phantom: PhantomData,
        }
    }

    /// Reducer built from a fallible closure. See [`try_reducer_fn`].
    pub struct TryFnReducer<F, S, A, E> {
        f: F,
        _phantom: PhantomData<fn(&S, &A) -> Result<S, E>>,
    }

    impl<F, S, A, E> Reducer for TryFnReducer<F, S, A, E>
    where
        F: Fn(&S, &A) -> Result<S, E>,
    {
        type State = S;
        type Action = A;
        type Error = E;

        fn reduce(&self, state: &S, action: &A) -> Result<S, E> {
            (self.f)(state, action)
        }
    }

    /// Wrap a fallible transition function as a [`Reducer`]
    pub const fn try_reducer_fn<S, A, E, F>(f: F) -> TryFnReducer<F, S, A, E>
    where
        F: Fn(&S, &A) -> Result<S, E>,
    {
        TryFnReducer {
            f,
            _phantom: PhantomData,
        }
    }
}

pub use action::{Action, ActionError, AnyAction};
pub use composition::{combine_reducers, scope_reducer};
pub use reducer::{Reducer, reducer_fn, try_reducer_fn};
pub use slice::{Slice, SliceBuilder};
