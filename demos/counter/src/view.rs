//! Store consumers.
//!
//! Each view is handed its store by the composition root instead of reaching
//! for a global. `mount` subscribes a re-render; the returned subscription is
//! how the view is unmounted.

use crate::DemoError;
use crate::counter::{self, CounterReducer};
use crate::panel::{PanelStore, cases};
use unistore_runtime::{Dispatched, Store, Subscription};

/// Sink receiving each rendered frame
pub trait Render: Fn(String) + Send + Sync + 'static {}

impl<F> Render for F where F: Fn(String) + Send + Sync + 'static {}

/// Displays the plain counter and exposes its buttons
#[derive(Debug, Clone)]
pub struct CounterView {
    store: Store<CounterReducer>,
}

impl CounterView {
    /// Create a view over `store`
    #[must_use]
    pub const fn new(store: Store<CounterReducer>) -> Self {
        Self { store }
    }

    /// Current frame
    #[must_use]
    pub fn render(&self) -> String {
        format!("Counter: {}", self.store.state().counter)
    }

    /// Re-render into `sink` after every dispatch
    pub fn mount(&self, sink: impl Render) -> Subscription {
        let view = self.clone();
        self.store.subscribe(move || sink(view.render()))
    }

    /// "+" button
    ///
    /// # Errors
    ///
    /// Returns [`DemoError`] if the dispatch fails.
    pub fn on_increment(&self) -> Result<Dispatched, DemoError> {
        Ok(self.store.dispatch(counter::increment()?)?)
    }

    /// "-" button
    ///
    /// # Errors
    ///
    /// Returns [`DemoError`] if the dispatch fails.
    pub fn on_decrement(&self) -> Result<Dispatched, DemoError> {
        Ok(self.store.dispatch(counter::decrement()?)?)
    }
}

/// Displays the panel slice and exposes its buttons
#[derive(Debug, Clone)]
pub struct PanelView {
    store: PanelStore,
}

impl PanelView {
    /// Create a view over `store`
    #[must_use]
    pub const fn new(store: PanelStore) -> Self {
        Self { store }
    }

    /// Current frame
    #[must_use]
    pub fn render(&self) -> String {
        let state = self.store.state();
        if state.visible {
            format!("Panel counter: {}", state.counter)
        } else {
            "Panel counter: (hidden)".to_string()
        }
    }

    /// Re-render into `sink` after every dispatch
    pub fn mount(&self, sink: impl Render) -> Subscription {
        let view = self.clone();
        self.store.subscribe(move || sink(view.render()))
    }

    /// "+5" button
    ///
    /// # Errors
    ///
    /// Returns [`DemoError`] if the action cannot be built or dispatched.
    pub fn on_add_five(&self) -> Result<Dispatched, DemoError> {
        self.send(cases::ADD_FIVE)
    }

    /// "show/hide" button
    ///
    /// # Errors
    ///
    /// Returns [`DemoError`] if the action cannot be built or dispatched.
    pub fn on_toggle(&self) -> Result<Dispatched, DemoError> {
        self.send(cases::TOGGLE_VISIBLE)
    }

    fn send(&self, case: &str) -> Result<Dispatched, DemoError> {
        let action = self.store.reducer().action(case)?;
        Ok(self.store.dispatch(action)?)
    }
}
