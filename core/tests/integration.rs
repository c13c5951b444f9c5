//! Full lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives a reqwest-backed
//! `TaskStore` and `TaskEditor` through every operation over real HTTP,
//! validating request building, response parsing and state handling
//! end-to-end.

use tasks_core::{StoreConfig, StoreError, TaskEditor, TaskFormData, TaskStore};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await });
    format!("http://{addr}")
}

#[tokio::test]
async fn crud_lifecycle() {
    let base_url = start_server().await;
    let config = StoreConfig::new(&base_url);

    // Step 1: mount — bootstrap listing is empty.
    let store = TaskStore::connect(&config).await.unwrap();
    assert!(store.tasks().is_empty(), "expected empty list");
    assert!(!store.loading());
    assert_eq!(store.error(), None);

    // Step 2: create through the editor.
    let mut editor = TaskEditor::new();
    editor.set_title("Integration test");
    editor.set_description("created over HTTP");
    assert!(editor.submit(&store).await);
    assert_eq!(editor.draft(), &TaskFormData::default());

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Integration test");
    assert!(!tasks[0].completed);
    assert!(tasks[0].created_at.is_some());
    let id = tasks[0].id;

    // Step 3: toggle.
    store.toggle_task(id).await;
    assert!(store.tasks()[0].completed);

    // Step 4: edit.
    assert!(editor.start_edit(&store.tasks(), id));
    assert_eq!(editor.draft().title, "Integration test");
    editor.set_title("Updated title");
    assert!(editor.submit(&store).await);
    assert!(!editor.is_editing());
    let task = &store.tasks()[0];
    assert_eq!(task.title, "Updated title");
    assert_eq!(task.description, "created over HTTP");
    assert!(!task.completed, "PUT without `completed` resets it");

    // Step 5: server-side validation message surfaces verbatim.
    assert!(!store.create_task(&TaskFormData::new("x".repeat(101), "")).await);
    assert_eq!(
        store.error_message().as_deref(),
        Some("Title must be less than 100 characters")
    );

    // Step 6: explicit fetch clears the error.
    store.fetch_tasks().await;
    assert_eq!(store.error(), None);

    // Step 7: delete.
    store.delete_task(id).await;
    assert!(store.tasks().is_empty(), "expected empty list after delete");

    // Step 8: delete again — 404 becomes a delete error, list untouched.
    store.delete_task(id).await;
    assert_eq!(store.error(), Some(StoreError::Delete));

    // Step 9: toggling a missing task is an update error.
    store.toggle_task(id).await;
    assert_eq!(store.error(), Some(StoreError::Update { server_message: None }));
}

#[tokio::test]
async fn unreachable_server_reports_load_and_connection_errors() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = TaskStore::connect(&StoreConfig::new(format!("http://{addr}")))
        .await
        .unwrap();
    assert_eq!(store.error(), Some(StoreError::Load));
    assert!(!store.loading());

    assert!(!store.create_task(&TaskFormData::new("Buy milk", "")).await);
    assert_eq!(store.error(), Some(StoreError::Connection));
    assert!(!store.submitting());
}
