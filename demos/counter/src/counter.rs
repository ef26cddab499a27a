//! Counter driven by dynamic actions.

use serde::{Deserialize, Serialize};
use unistore_core::{ActionError, AnyAction, Reducer};

/// Action types understood by [`CounterReducer`]
pub mod types {
    /// Add one
    pub const INCREMENT: &str = "INCREMENT";
    /// Subtract one
    pub const DECREMENT: &str = "DECREMENT";
    /// Add the integer payload
    pub const ADD: &str = "ADD";
    /// Back to zero
    pub const RESET: &str = "RESET";
}

/// Counter state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Current count value
    pub counter: i64,
}

/// Counter reducer
///
/// Pure: each arm builds a new [`CounterState`]. Unknown action types return
/// the state unchanged. `ADD` fails if its payload is not an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = AnyAction;
    type Error = ActionError;

    fn reduce(&self, state: &CounterState, action: &AnyAction) -> Result<CounterState, ActionError> {
        let counter = match action.action_type() {
            types::INCREMENT => state.counter.saturating_add(1),
            types::DECREMENT => state.counter.saturating_sub(1),
            types::ADD => state.counter.saturating_add(action.payload_as::<i64>()?),
            types::RESET => 0,
            _ => return Ok(*state),
        };

        Ok(CounterState { counter })
    }
}

/// `INCREMENT`
///
/// # Errors
///
/// Never in practice; the type is a non-empty constant.
pub fn increment() -> Result<AnyAction, ActionError> {
    AnyAction::new(types::INCREMENT)
}

/// `DECREMENT`
///
/// # Errors
///
/// Never in practice; the type is a non-empty constant.
pub fn decrement() -> Result<AnyAction, ActionError> {
    AnyAction::new(types::DECREMENT)
}

/// `ADD` with `amount` as payload
///
/// # Errors
///
/// Never in practice; the type is a non-empty constant.
pub fn add(amount: i64) -> Result<AnyAction, ActionError> {
    AnyAction::with_payload(types::ADD, amount)
}

/// `RESET`
///
/// # Errors
///
/// Never in practice; the type is a non-empty constant.
pub fn reset() -> Result<AnyAction, ActionError> {
    AnyAction::new(types::RESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unistore_testing::{ReducerTest, assertions};

    #[test]
    fn test_increment() -> Result<(), ActionError> {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState::default())
            .when_action(increment()?)
            .then_state(|state| assert_eq!(state.counter, 1))
            .run();
        Ok(())
    }

    #[test]
    fn test_decrement() -> Result<(), ActionError> {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { counter: 5 })
            .when_action(decrement()?)
            .then_state(|state| assert_eq!(state.counter, 4))
            .run();
        Ok(())
    }

    #[test]
    fn test_add_and_reset() -> Result<(), ActionError> {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { counter: 2 })
            .when_actions([add(40)?, reset()?, add(-3)?])
            .then_state(|state| assert_eq!(state.counter, -3))
            .run();
        Ok(())
    }

    #[test]
    fn test_add_with_bad_payload_fails() -> Result<(), ActionError> {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { counter: 1 })
            .when_action(AnyAction::from_json(json!({ "type": "ADD", "payload": "ten" }))?)
            .then_error(|error| assert!(matches!(error, ActionError::Payload { .. })))
            .then_state(|state| assert_eq!(state.counter, 1))
            .run();
        Ok(())
    }

    #[test]
    fn test_unknown_type_is_noop() -> Result<(), ActionError> {
        assertions::assert_unchanged(
            &CounterReducer,
            &CounterState { counter: 9 },
            &AnyAction::new("NOOP")?,
        );
        Ok(())
    }

    #[test]
    fn test_saturates_at_bounds() -> Result<(), ActionError> {
        let state = CounterState { counter: i64::MAX };
        assert_eq!(CounterReducer.reduce(&state, &increment()?)?, state);
        Ok(())
    }
}
