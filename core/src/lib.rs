//! Client core for the task-tracking API.
//!
//! # Overview
//! `TaskStore` owns the cached task collection plus the `loading`,
//! `submitting` and `error` flags a view renders, and keeps them in sync with
//! the REST API by re-listing after every mutation. `TaskEditor` holds the
//! create/edit form draft on top of it.
//!
//! # Design
//! - `TaskClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_list_tasks` decodes a listing and `check_success` judges a
//!   mutation response by status.
//! - `Transport` executes requests. `ReqwestTransport` is the production
//!   implementation; tests substitute scripted ones.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TaskClient;
pub use config::{ListingOrder, StoreConfig};
pub use editor::TaskEditor;
pub use error::{ApiError, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{TaskState, TaskStore};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTask, Task, TaskFormData, UpdateTask};
