use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of POST and PUT. Every field is optional on the wire so that a
/// missing title surfaces as a validation error rather than a decode error.
/// A missing `completed` means `false` for both.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default)]
pub struct Tasks {
    next_id: i64,
    by_id: BTreeMap<i64, Task>,
}

pub type Db = Arc<RwLock<Tasks>>;

/// A failed request, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Task not found".to_string(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Tasks::default()));
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(toggle_task))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Title is required, not blank, at most `TITLE_MAX` characters; the
/// description is at most `DESCRIPTION_MAX`.
pub fn validate(input: &TaskPayload) -> Result<(String, String), ApiFailure> {
    let title = input.title.clone().unwrap_or_default();
    if title.trim().is_empty() {
        return Err(ApiFailure::bad_request("Title is required"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(ApiFailure::bad_request("Title must be less than 100 characters"));
    }
    let description = input.description.clone().unwrap_or_default();
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(ApiFailure::bad_request(
            "Description must be less than 500 characters",
        ));
    }
    Ok((title, description))
}

async fn list_tasks(State(db): State<Db>) -> Json<Vec<Task>> {
    let tasks = db.read().await;
    Json(tasks.by_id.values().cloned().collect())
}

async fn create_task(
    State(db): State<Db>,
    Json(input): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiFailure> {
    let (title, description) = validate(&input)?;
    let mut tasks = db.write().await;
    tasks.next_id += 1;
    let stamp = now();
    let task = Task {
        id: tasks.next_id,
        title,
        description,
        completed: input.completed.unwrap_or(false),
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    tasks.by_id.insert(task.id, task.clone());
    tracing::info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Task>, ApiFailure> {
    let tasks = db.read().await;
    tasks.by_id.get(&id).cloned().map(Json).ok_or_else(ApiFailure::not_found)
}

async fn update_task(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TaskPayload>,
) -> Result<Json<Task>, ApiFailure> {
    let (title, description) = validate(&input)?;
    let mut tasks = db.write().await;
    let task = tasks.by_id.get_mut(&id).ok_or_else(ApiFailure::not_found)?;
    task.title = title;
    task.description = description;
    // PUT is a full replace: an omitted flag resets to incomplete.
    task.completed = input.completed.unwrap_or(false);
    task.updated_at = now();
    Ok(Json(task.clone()))
}

async fn toggle_task(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Task>, ApiFailure> {
    let mut tasks = db.write().await;
    let task = tasks.by_id.get_mut(&id).ok_or_else(ApiFailure::not_found)?;
    task.completed = !task.completed;
    task.updated_at = now();
    Ok(Json(task.clone()))
}

async fn delete_task(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiFailure> {
    let mut tasks = db.write().await;
    tasks
        .by_id
        .remove(&id)
        .map(|_| {
            tracing::info!(id, "task deleted");
            StatusCode::NO_CONTENT
        })
        .ok_or_else(ApiFailure::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> TaskPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn task_serializes_with_camel_case_timestamps() {
        let task = Task {
            id: 1,
            title: "Test".to_string(),
            description: String::new(),
            completed: false,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00+00:00");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn payload_fields_are_optional() {
        let input = payload("{}");
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn validate_requires_title() {
        let err = validate(&payload(r#"{"description":"x"}"#)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Title is required");

        let err = validate(&payload(r#"{"title":"   "}"#)).unwrap_err();
        assert_eq!(err.message, "Title is required");
    }

    #[test]
    fn validate_enforces_lengths() {
        let long_title = "x".repeat(TITLE_MAX + 1);
        let err = validate(&TaskPayload {
            title: Some(long_title),
            ..TaskPayload::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "Title must be less than 100 characters");

        let err = validate(&TaskPayload {
            title: Some("ok".to_string()),
            description: Some("y".repeat(DESCRIPTION_MAX + 1)),
            ..TaskPayload::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "Description must be less than 500 characters");
    }

    #[test]
    fn validate_defaults_description() {
        let (title, description) = validate(&payload(r#"{"title":"Walk dog"}"#)).unwrap();
        assert_eq!(title, "Walk dog");
        assert_eq!(description, "");
    }
}
