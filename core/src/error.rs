//! Error types for the task API client and the task store.
//!
//! # Design
//! `ApiError` is the protocol layer: what went wrong with one request.
//! `StoreError` is what a consumer of `TaskStore` sees: one variant per
//! failure category, each with a fixed user-facing message. Only create and
//! update failures may carry a server-supplied override.

use thiserror::Error;

/// Errors returned by `TaskClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404. The body is kept for error-message
    /// extraction.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The round-trip never completed (connect, timeout, body read).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// The server-supplied `error` field of a failure body, if any.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::NotFound { body } | ApiError::HttpError { body, .. } => {
                crate::client::server_error_message(body)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

pub const MSG_EMPTY_TITLE: &str = "Task title is required.";
pub const MSG_LOAD: &str = "Failed to load tasks. Check that the server is running.";
pub const MSG_CREATE: &str = "Failed to add task. Please try again.";
pub const MSG_UPDATE: &str = "Failed to update task. Please try again.";
pub const MSG_DELETE: &str = "Failed to remove task. Please try again.";
pub const MSG_CONNECTION: &str = "Could not connect to the server. Check your connection.";

/// The store's error channel. Rendered through `Display` as the message a
/// UI should show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Draft rejected before any request was made.
    #[error("{}", MSG_EMPTY_TITLE)]
    EmptyTitle,

    #[error("{}", MSG_LOAD)]
    Load,

    #[error("{}", .server_message.as_deref().unwrap_or(MSG_CREATE))]
    Create { server_message: Option<String> },

    /// Also used for toggle failures, which never carry a server message.
    #[error("{}", .server_message.as_deref().unwrap_or(MSG_UPDATE))]
    Update { server_message: Option<String> },

    #[error("{}", MSG_DELETE)]
    Delete,

    /// A create or update request never completed.
    #[error("{}", MSG_CONNECTION)]
    Connection,
}

impl StoreError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}
