// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types and backend error-body parsing.

use serde_json::Value;

/// Client error type. Its `Display` text is what ends up in the status slot.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{}", ClientError::LOGIN_REQUIRED)]
    NotLoggedIn,

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Guard text shown when a content action is attempted without a session.
    pub const LOGIN_REQUIRED: &'static str = "Log in first.";

    /// Fallback when the backend gives no parseable error body.
    pub const UNKNOWN_ERROR: &'static str = "Unknown error";

    /// Human-readable message for the status slot.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Pull a message out of an error response body.
///
/// Looks at `error`, then `message`; empty strings count as absent. Anything
/// that is not a JSON object yields [`ClientError::UNKNOWN_ERROR`].
pub fn extract_error_message(body: &str) -> String {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return ClientError::UNKNOWN_ERROR.to_string();
    };

    ["error", "message"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ClientError::UNKNOWN_ERROR.to_string())
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
