//! Extraction of `updateAction` from parsed JSON payloads.

use crate::action::{translate_action, Action};
use crate::error::{ClassificationError, ClassificationResult};
use serde_json::Value;

/// Name of the JSON field carrying the update action.
pub const UPDATE_ACTION_FIELD: &str = "updateAction";

/// Extracts the action from an already-parsed JSON body.
///
/// The body must be an object whose `updateAction` field is a non-empty
/// string; anything else is a [`ClassificationError::MalformedJson`]. The
/// value is passed to the translator untouched, so an unrecognized token is
/// a successful `None`. No other field is validated.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{inspect_json, Action};
/// use serde_json::json;
///
/// let body = json!({"updateAction": "delete"});
/// assert_eq!(inspect_json(Some(&body)).unwrap(), Some(Action::Delete));
/// assert!(inspect_json(Some(&json!({}))).is_err());
/// ```
pub fn inspect_json(body: Option<&Value>) -> ClassificationResult<Option<Action>> {
    body.and_then(|value| value.get(UPDATE_ACTION_FIELD))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(translate_action)
        .ok_or(ClassificationError::MalformedJson)
}
