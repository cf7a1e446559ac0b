//! W3C WebDriver response envelopes.
//!
//! Every response body is `{"value": ...}`. Errors put an object carrying
//! `error` and `message` in `value`, usually alongside a 4xx/5xx status.

use serde_json::Value;

use crate::driver::ElementHandle;
use crate::error::DriverError;

/// Key under which W3C endpoints return element references.
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4a4e7b6b8b8b";

/// Pre-W3C key still returned by some older drivers.
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// WebDriver error code for a lookup that matched nothing.
pub(crate) const NO_SUCH_ELEMENT: &str = "no such element";

/// Unwraps the `value` of a response body, turning error envelopes into
/// [`DriverError::Protocol`].
pub(crate) fn unwrap_value(command: &str, body: Value) -> Result<Value, DriverError> {
    let Value::Object(mut map) = body else {
        return Err(DriverError::UnexpectedResponse {
            command: command.to_owned(),
            reason: "response body is not a JSON object".to_owned(),
        });
    };
    let value = map.remove("value").unwrap_or(Value::Null);

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        return Err(DriverError::Protocol {
            command: command.to_owned(),
            error: error.to_owned(),
            message,
        });
    }
    Ok(value)
}

/// `true` when `err` is the "no such element" protocol error.
pub(crate) fn is_no_such_element(err: &DriverError) -> bool {
    matches!(err, DriverError::Protocol { error, .. } if error == NO_SUCH_ELEMENT)
}

/// Reads an element reference object.
pub(crate) fn element_from_value(
    command: &str,
    value: &Value,
) -> Result<ElementHandle, DriverError> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(ElementHandle::new)
        .ok_or_else(|| DriverError::UnexpectedResponse {
            command: command.to_owned(),
            reason: format!("no element reference in {value}"),
        })
}

/// Reads the session id from a new-session response (W3C `value.sessionId`,
/// or legacy top-level `sessionId`).
pub(crate) fn session_id_from_body(body: &Value) -> Option<String> {
    body.get("value")
        .and_then(|v| v.get("sessionId"))
        .or_else(|| body.get("sessionId"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Reads a string `value`; `null` is `None`.
pub(crate) fn optional_string(command: &str, value: Value) -> Result<Option<String>, DriverError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(DriverError::UnexpectedResponse {
            command: command.to_owned(),
            reason: format!("expected a string, got {other}"),
        }),
    }
}
