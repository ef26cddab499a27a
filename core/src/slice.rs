//! Slices: a named bundle of initial state and case reducers.
//!
//! A slice owns a namespace. Each case it declares handles exactly one action
//! type, `"<slice name>/<case name>"`, and the slice hands out correctly-typed
//! [`AnyAction`] values for its cases so callers never spell the namespace by
//! hand.
//!
//! Case handlers build the next state explicitly from the current one:
//!
//! ```
//! use unistore_core::{Reducer, Slice};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Panel {
//!     counter: i64,
//!     visible: bool,
//! }
//!
//! let slice = Slice::builder("panel", Panel { counter: 0, visible: true })
//!     .case("add_five", |s: &Panel, _| Panel { counter: s.counter + 5, ..s.clone() })
//!     .case("toggle", |s: &Panel, _| Panel { visible: !s.visible, ..s.clone() })
//!     .build();
//!
//! let action = slice.action("add_five")?;
//! assert_eq!(action.action_type(), "panel/add_five");
//!
//! let next = slice.reduce(slice.initial_state(), &action);
//! assert_eq!(next, Ok(Panel { counter: 5, visible: true }));
//! # Ok::<(), unistore_core::ActionError>(())
//! ```

use crate::action::{ActionError, AnyAction};
use crate::reducer::Reducer;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

/// Separator between slice name and case name in an action type
pub const SEPARATOR: char = '/';

/// A case handler: builds the next state from the current one and the payload
pub type CaseReducer<S> = Box<dyn Fn(&S, Option<&Value>) -> S + Send + Sync>;

/// Named state slice with case reducers keyed by action name
pub struct Slice<S> {
    name: String,
    initial_state: S,
    cases: HashMap<String, CaseReducer<S>>,
}

impl<S> Slice<S> {
    /// Start building a slice
    #[must_use]
    pub fn builder(name: impl Into<String>, initial_state: S) -> SliceBuilder<S> {
        SliceBuilder {
            name: name.into(),
            initial_state,
            cases: HashMap::new(),
        }
    }

    /// The slice's namespace
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default state
    #[must_use]
    pub const fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// Declared case names, in no particular order
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    /// Whether this slice declares `case`
    #[must_use]
    pub fn has_case(&self, case: &str) -> bool {
        self.cases.contains_key(case)
    }

    /// Build the action for one of this slice's cases
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownCase`] if the slice does not declare `case`.
    pub fn action(&self, case: &str) -> Result<AnyAction, ActionError> {
        AnyAction::new(self.action_type(case)?)
    }

    /// Build the action for one of this slice's cases, with a payload
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownCase`] if the slice does not declare `case`.
    pub fn action_with(
        &self,
        case: &str,
        payload: impl Into<Value>,
    ) -> Result<AnyAction, ActionError> {
        AnyAction::with_payload(self.action_type(case)?, payload)
    }

    fn action_type(&self, case: &str) -> Result<String, ActionError> {
        if !self.has_case(case) {
            return Err(ActionError::UnknownCase {
                slice: self.name.clone(),
                case: case.to_string(),
            });
        }
        Ok(format!("{}{SEPARATOR}{case}", self.name))
    }

    /// Resolve an action type to the case it targets, if it belongs here
    fn case_for(&self, action_type: &str) -> Option<&CaseReducer<S>> {
        let case = action_type
            .strip_prefix(self.name.as_str())?
            .strip_prefix(SEPARATOR)?;
        self.cases.get(case)
    }
}

impl<S: Clone> Reducer for Slice<S> {
    type State = S;
    type Action = AnyAction;
    type Error = Infallible;

    fn reduce(&self, state: &S, action: &AnyAction) -> Result<S, Infallible> {
        match self.case_for(action.action_type()) {
            Some(handler) => Ok(handler(state, action.payload())),
            None => Ok(state.clone()),
        }
    }

    fn initial_state(&self) -> Option<S> {
        Some(self.initial_state.clone())
    }
}

impl<S> fmt::Debug for Slice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cases: Vec<&str> = self.case_names().collect();
        cases.sort_unstable();
        f.debug_struct("Slice")
            .field("name", &self.name)
            .field("cases", &cases)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`Slice::builder`]
pub struct SliceBuilder<S> {
    name: String,
    initial_state: S,
    cases: HashMap<String, CaseReducer<S>>,
}

impl<S> SliceBuilder<S> {
    /// Declare a case
    ///
    /// Declaring the same case twice keeps the later handler.
    #[must_use]
    pub fn case<F>(mut self, case: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&S, Option<&Value>) -> S + Send + Sync + 'static,
    {
        let case = case.into();
        if self.cases.insert(case.clone(), Box::new(handler)).is_some() {
            tracing::warn!(slice = %self.name, case = %case, "Case declared twice, keeping the later handler");
        }
        self
    }

    /// Finish the slice
    #[must_use]
    pub fn build(self) -> Slice<S> {
        tracing::trace!(slice = %self.name, cases = self.cases.len(), "Slice built");
        Slice {
            name: self.name,
            initial_state: self.initial_state,
            cases: self.cases,
        }
    }
}
