//! Domain DTOs for the task API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so
//! the client never links against server internals. Integration tests catch
//! schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A task as returned by the API. The client only ever holds a cached copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    /// Absent and `null` both decode as an empty description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Client-only draft shared by the create and edit flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFormData {
    pub title: String,
    pub description: String,
}

impl TaskFormData {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// True when the title is empty after trimming.
    pub fn title_is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }
}

impl From<&Task> for TaskFormData {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
        }
    }
}

/// Request payload for `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl From<&TaskFormData> for CreateTask {
    /// New tasks always start incomplete.
    fn from(draft: &TaskFormData) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            completed: false,
        }
    }
}

/// Request payload for `PUT /api/tasks/{id}`. Completion is left to the
/// toggle endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
}

impl From<&TaskFormData> for UpdateTask {
    fn from(draft: &TaskFormData) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
        }
    }
}

/// Best-effort error body carried by failed create/update responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
