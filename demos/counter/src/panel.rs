//! Panel slice: a counter that steps by five and can be hidden.

use serde::{Deserialize, Serialize};
use unistore_core::Slice;
use unistore_runtime::{Store, StoreConfig};

/// Slice namespace
pub const NAME: &str = "panel";

/// Case names declared by [`panel_slice`]
pub mod cases {
    /// Add five to the counter
    pub const ADD_FIVE: &str = "add_five";
    /// Flip the visibility flag
    pub const TOGGLE_VISIBLE: &str = "toggle_visible";
}

/// Panel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    /// Current count value
    pub counter: i64,
    /// Whether the counter is shown
    pub visible: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            counter: 0,
            visible: true,
        }
    }
}

/// Store running the panel slice
pub type PanelStore = Store<Slice<PanelState>>;

/// Build the panel slice
#[must_use]
pub fn panel_slice() -> Slice<PanelState> {
    Slice::builder(NAME, PanelState::default())
        .case(cases::ADD_FIVE, |state: &PanelState, _| PanelState {
            counter: state.counter.saturating_add(5),
            ..*state
        })
        .case(cases::TOGGLE_VISIBLE, |state: &PanelState, _| PanelState {
            visible: !state.visible,
            ..*state
        })
        .build()
}

/// Build a store for the panel, starting at the slice's declared default
#[must_use]
pub fn panel_store() -> PanelStore {
    let slice = panel_slice();
    let initial = *slice.initial_state();
    Store::with_config(slice, initial, StoreConfig::default().with_name(NAME))
}
