//! Actions: tagged descriptions of an intended state transition.
//!
//! Two shapes are supported:
//!
//! - **Typed actions**: any type implementing [`Action`]. Enums are the natural
//!   fit; the discriminant is usually the variant name.
//! - **Dynamic actions**: [`AnyAction`], a `{"type": ..., "payload": ...}`
//!   descriptor for hosts that route actions as data.
//!
//! A dynamic action without a usable discriminant is rejected when it is
//! constructed, so a malformed action can never reach a store.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trait for values that can be dispatched to a store
///
/// The discriminant is used for logging, metrics labels and, in the case of
/// [`AnyAction`], for routing inside reducers.
pub trait Action {
    /// The action's discriminant (its "type")
    fn action_type(&self) -> &str;
}

impl<A: Action + ?Sized> Action for &A {
    fn action_type(&self) -> &str {
        (**self).action_type()
    }
}

impl<A: Action + ?Sized> Action for Box<A> {
    fn action_type(&self) -> &str {
        (**self).action_type()
    }
}

/// Errors raised while building or decoding actions
#[derive(Error, Debug)]
pub enum ActionError {
    /// The descriptor has no `type` field
    #[error("action is missing its \"type\" discriminant")]
    MissingType,

    /// The `type` field is present but not a non-empty string
    #[error("action \"type\" must be a non-empty string, got {0}")]
    InvalidType(String),

    /// A slice was asked for a case it does not declare
    #[error("slice `{slice}` has no case named `{case}`")]
    UnknownCase {
        /// Slice name
        slice: String,
        /// Requested case
        case: String,
    },

    /// The payload could not be decoded into the requested type
    #[error("payload of action `{action_type}` could not be decoded: {source}")]
    Payload {
        /// Discriminant of the offending action
        action_type: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// The input was not a JSON object
    #[error("invalid action descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dynamic action descriptor: required string discriminant plus optional payload
///
/// Serializes as `{"type": "...", "payload": ...}`; the payload key is
/// omitted when there is none.
///
/// # Example
///
/// ```
/// use unistore_core::AnyAction;
/// use serde_json::json;
///
/// let action = AnyAction::from_json(json!({ "type": "counter/add", "payload": 5 }))?;
/// assert_eq!(action.action_type(), "counter/add");
/// assert_eq!(action.payload_as::<i64>()?, 5);
///
/// assert!(AnyAction::from_json(json!({ "payload": 5 })).is_err());
/// # Ok::<(), unistore_core::ActionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction")]
pub struct AnyAction {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl AnyAction {
    /// Create an action without payload
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidType`] if `action_type` is empty.
    pub fn new(action_type: impl Into<String>) -> Result<Self, ActionError> {
        let action_type = validate_type(action_type.into())?;
        Ok(Self {
            action_type,
            payload: None,
        })
    }

    /// Create an action carrying a JSON payload
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidType`] if `action_type` is empty.
    pub fn with_payload(
        action_type: impl Into<String>,
        payload: impl Into<Value>,
    ) -> Result<Self, ActionError> {
        let action_type = validate_type(action_type.into())?;
        Ok(Self {
            action_type,
            payload: Some(payload.into()),
        })
    }

    /// Build an action from an already-parsed JSON descriptor
    ///
    /// # Errors
    ///
    /// - [`ActionError::Json`] if the value is not an object
    /// - [`ActionError::MissingType`] if there is no `type` field
    /// - [`ActionError::InvalidType`] if `type` is not a non-empty string
    pub fn from_json(value: Value) -> Result<Self, ActionError> {
        let raw: RawAction = serde_json::from_value(value)?;
        Self::try_from(raw)
    }

    /// The discriminant
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// The raw payload, if any
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Decode the payload into `T`
    ///
    /// A missing payload decodes as JSON `null`, so `Option<T>` targets yield
    /// `None` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Payload`] if the payload does not match `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ActionError> {
        let value = self.payload.clone().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| ActionError::Payload {
            action_type: self.action_type.clone(),
            source,
        })
    }
}

impl Action for AnyAction {
    fn action_type(&self) -> &str {
        &self.action_type
    }
}

impl fmt::Display for AnyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({payload})", self.action_type),
            None => f.write_str(&self.action_type),
        }
    }
}

impl FromStr for AnyAction {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawAction = serde_json::from_str(s)?;
        Self::try_from(raw)
    }
}

/// Wire shape before validation
#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type", default)]
    action_type: Option<Value>,
    #[serde(default)]
    payload: Option<Value>,
}

impl TryFrom<RawAction> for AnyAction {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let action_type = match raw.action_type {
            None | Some(Value::Null) => return Err(ActionError::MissingType),
            Some(Value::String(action_type)) => validate_type(action_type)?,
            Some(other) => return Err(ActionError::InvalidType(other.to_string())),
        };

        Ok(Self {
            action_type,
            payload: raw.payload,
        })
    }
}

fn validate_type(action_type: String) -> Result<String, ActionError> {
    if action_type.trim().is_empty() {
        return Err(ActionError::InvalidType(format!("{action_type:?}")));
    }
    Ok(action_type)
}
