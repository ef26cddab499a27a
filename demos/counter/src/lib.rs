//! # Counter Demo
//!
//! Two small stores demonstrating Unistore.
//!
//! - [`counter`]: a plain reducer over dynamic actions (`INCREMENT`,
//!   `DECREMENT`, `ADD`, `RESET`); anything else is a no-op
//! - [`panel`]: a slice holding a counter and a visibility flag, with
//!   `add_five` and `toggle_visible` cases
//! - [`view`]: consumers that receive their store explicitly and re-render
//!   when notified
//!
//! ## Example
//!
//! ```
//! use counter::counter::{self as actions, CounterReducer, CounterState};
//! use unistore_runtime::Store;
//!
//! let store = Store::new(CounterReducer);
//!
//! store.dispatch(actions::increment()?)?;
//! store.dispatch(actions::increment()?)?;
//! store.dispatch(actions::decrement()?)?;
//! assert_eq!(*store.state(), CounterState { counter: 1 });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;
use unistore_core::ActionError;
use unistore_runtime::DispatchError;

/// Plain reducer counter
pub mod counter;

/// Slice-based panel (counter + visibility)
pub mod panel;

/// Store consumers
pub mod view;

/// Errors surfaced by the demo's event handlers
#[derive(Error, Debug)]
pub enum DemoError {
    /// An action could not be built
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The store refused or failed the dispatch
    #[error("dispatch failed: {0}")]
    Dispatch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A state snapshot could not be rendered as JSON
    #[error("state could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl<E> From<DispatchError<E>> for DemoError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: DispatchError<E>) -> Self {
        Self::Dispatch(Box::new(error))
    }
}
