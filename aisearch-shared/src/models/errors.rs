//! Error bodies returned by the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detail string the backend returns for a failed password login.
pub const DETAIL_BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Detail string the backend returns when signing up with a taken username.
pub const DETAIL_ALREADY_REGISTERED: &str = "Email already registered";

/// Error body returned by the backend (`{"detail": ...}`).
///
/// `detail` is usually a string, but request validation failures carry a
/// list of objects instead, so it is kept as raw JSON.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Backend-provided failure description.
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorResponse {
    /// Returns the detail as readable text, if any.
    ///
    /// Validation error lists are flattened to their `msg` fields.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(text) => Some(text.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("request failed"),
        }
    }
}

impl std::error::Error for ErrorResponse {}
