//! Response classification

use serde_json::Value;

use crate::error::{RestError, RestResult};
use crate::types::JsonObject;

fn parse_object(body: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Turn an HTTP status and raw body into a call result
///
/// - 200 with a JSON object body is success
/// - 200 with anything else is [`RestError::Protocol`]
/// - any other status is [`RestError::Api`], using the body's `error` field
///   when the body is an object that has one, and the raw body otherwise
pub fn classify_response(status: u16, body: &str) -> RestResult<JsonObject> {
    let parsed = parse_object(body);

    if status == 200 {
        return parsed.ok_or_else(|| RestError::not_an_object(body));
    }

    let message = match parsed.as_ref().and_then(|obj| obj.get("error")) {
        Some(Value::String(error)) => error.clone(),
        Some(error) => error.to_string(),
        None => body.to_string(),
    };

    Err(RestError::Api { status, message })
}
