//! Integration tests for the counter demo
//!
//! End-to-end flows through stores, views and observers.

use counter::DemoError;
use counter::counter::{self as actions, CounterReducer, CounterState, types};
use counter::panel::{PanelState, cases, panel_slice, panel_store};
use counter::view::{CounterView, PanelView};
use proptest::prelude::*;
use unistore_core::{AnyAction, Slice};
use unistore_runtime::{Dispatched, Store};
use unistore_testing::{RecordingObserver, properties};

#[test]
fn test_counter_with_store() -> Result<(), DemoError> {
    let store = Store::new(CounterReducer);
    assert_eq!(store.state().counter, 0);

    store.dispatch(actions::increment()?)?;
    assert_eq!(store.state().counter, 1);

    store.dispatch(actions::increment()?)?;
    assert_eq!(store.state().counter, 2);

    store.dispatch(actions::decrement()?)?;
    assert_eq!(store.state().counter, 1);

    store.dispatch(AnyAction::new("NOOP")?)?;
    assert_eq!(*store.state(), CounterState { counter: 1 });
    Ok(())
}

#[test]
fn test_every_dispatch_notifies_even_noop() -> Result<(), DemoError> {
    let store = Store::new(CounterReducer);
    let recorder = RecordingObserver::new();
    let _subscription = store.subscribe(recorder.observer("view"));

    store.dispatch(actions::increment()?)?;
    store.dispatch(AnyAction::new("NOOP")?)?;

    assert_eq!(recorder.count("view"), 2);
    Ok(())
}

#[test]
fn test_bad_payload_leaves_state_and_observers_alone() -> Result<(), DemoError> {
    let store = Store::new(CounterReducer);
    let recorder = RecordingObserver::new();
    let _subscription = store.subscribe(recorder.observer("view"));

    store.dispatch(actions::add(3)?)?;
    let bad = AnyAction::with_payload(types::ADD, "three")?;
    assert!(store.dispatch(bad).is_err());

    assert_eq!(store.state().counter, 3);
    assert_eq!(recorder.total(), 1);
    Ok(())
}

#[test]
fn test_concurrent_increments() -> Result<(), DemoError> {
    let store = Store::new(CounterReducer);
    let increment = actions::increment()?;

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let store = store.clone();
            let increment = increment.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    let _ = store.dispatch(increment.clone());
                }
            });
        }
    });

    assert_eq!(store.state().counter, 200);
    Ok(())
}

#[test]
fn test_panel_scenario() -> Result<(), DemoError> {
    let store = panel_store();
    let slice = store.reducer();

    store.dispatch(slice.action(cases::ADD_FIVE)?)?;
    store.dispatch(slice.action(cases::ADD_FIVE)?)?;
    store.dispatch(slice.action(cases::TOGGLE_VISIBLE)?)?;

    assert_eq!(
        *store.state(),
        PanelState {
            counter: 10,
            visible: false
        }
    );
    Ok(())
}

#[test]
fn test_panel_ignores_other_slices() -> Result<(), DemoError> {
    let other: Slice<PanelState> = Slice::builder("other", PanelState::default())
        .case(cases::ADD_FIVE, |state: &PanelState, _| *state)
        .build();
    let store = panel_store();

    let outcome = store.dispatch(other.action(cases::ADD_FIVE)?)?;

    assert_eq!(outcome, Dispatched::Applied);
    assert_eq!(*store.state(), PanelState::default());
    Ok(())
}

#[test]
fn test_views_are_isolated_per_store() -> Result<(), DemoError> {
    let first = CounterView::new(Store::new(CounterReducer));
    let second = CounterView::new(Store::new(CounterReducer));

    first.on_increment()?;

    assert_eq!(first.render(), "Counter: 1");
    assert_eq!(second.render(), "Counter: 0");
    Ok(())
}

#[test]
fn test_unmounted_view_stops_rendering() -> Result<(), DemoError> {
    let view = PanelView::new(panel_store());
    let recorder = RecordingObserver::new();
    let frame = recorder.observer("frame");
    let mounted = view.mount(move |_| frame());

    view.on_add_five()?;
    assert!(mounted.unsubscribe());
    view.on_toggle()?;

    assert_eq!(recorder.total(), 1);
    assert_eq!(view.render(), "Panel counter: (hidden)");
    Ok(())
}

proptest! {
    #[test]
    fn prop_store_matches_reference_fold(
        choices in properties::action_sequence(vec![types::INCREMENT, types::DECREMENT, types::RESET], 32)
    ) {
        let actions: Vec<AnyAction> = choices
            .into_iter()
            .filter_map(|action_type| AnyAction::new(action_type).ok())
            .collect();
        let store = Store::new(CounterReducer);
        for action in &actions {
            prop_assert!(store.dispatch(action.clone()).is_ok());
        }

        let expected = properties::fold(&CounterReducer, CounterState::default(), &actions).ok();
        prop_assert_eq!(Some(*store.state()), expected);
    }

    #[test]
    fn prop_panel_ignores_unknown_actions(
        action in properties::unknown_action(&["panel/add_five", "panel/toggle_visible"])
    ) {
        let slice = panel_slice();
        let store = Store::with_state(slice, PanelState::default());
        prop_assert!(store.dispatch(action).is_ok());
        prop_assert_eq!(*store.state(), PanelState::default());
    }
}
