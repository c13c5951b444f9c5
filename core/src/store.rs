//! Stateful task store: the single owner of the cached task collection and
//! of every network-derived status flag.
//!
//! # Design
//! - Every mutation is followed by a full re-list; the cached collection is
//!   never patched locally, so it is always a verbatim server listing.
//! - `loading` and `submitting` are released by drop guards, so every exit
//!   path clears them.
//! - No error escapes as a `Result`. Failures land in `error` as a
//!   `StoreError`; diagnostic detail goes to `tracing`.
//! - Operations take `&self` and may run concurrently (e.g. `tokio::join!`).
//!   Nothing is queued; see `ListingOrder` for how overlapping listings
//!   resolve.

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::client::{check_success, TaskClient};
use crate::config::{ListingOrder, StoreConfig};
use crate::error::{ApiError, StoreError};
use crate::http::HttpRequest;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTask, Task, TaskFormData, UpdateTask};

/// Point-in-time copy of everything a view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<StoreError>,
}

#[derive(Debug, Default)]
struct Inner {
    state: TaskState,
    /// Generation of the most recently issued listing request.
    issued: u64,
}

pub struct TaskStore<T> {
    client: TaskClient,
    transport: T,
    listing_order: ListingOrder,
    inner: Mutex<Inner>,
}

impl<T> std::fmt::Debug for TaskStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("client", &self.client)
            .field("listing_order", &self.listing_order)
            .finish_non_exhaustive()
    }
}

impl TaskStore<ReqwestTransport> {
    /// Build a reqwest-backed store from `config` and load the collection.
    pub async fn connect(config: &StoreConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::mount(transport, config).await)
    }
}

impl<T: Transport> TaskStore<T> {
    /// An idle store with an empty collection. Nothing is fetched.
    pub fn new(transport: T, config: &StoreConfig) -> Self {
        Self {
            client: TaskClient::new(&config.base_url),
            transport,
            listing_order: config.listing_order,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Build the store and perform the initial listing.
    pub async fn mount(transport: T, config: &StoreConfig) -> Self {
        let store = Self::new(transport, config);
        store.fetch_tasks().await;
        store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn snapshot(&self) -> TaskState {
        self.inner.lock().state.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.lock().state.tasks.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.lock().state.loading
    }

    pub fn submitting(&self) -> bool {
        self.inner.lock().state.submitting
    }

    pub fn error(&self) -> Option<StoreError> {
        self.inner.lock().state.error.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.inner.lock().state.error.as_ref().map(StoreError::message)
    }

    /// Dismiss the current error without running an operation.
    pub fn clear_error(&self) {
        self.inner.lock().state.error = None;
    }

    /// Replace the cached collection with a fresh listing.
    ///
    /// On failure the previous collection is kept and `error` is set to
    /// `StoreError::Load`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_tasks(&self) {
        let generation = {
            let mut inner = self.inner.lock();
            inner.state.loading = true;
            inner.state.error = None;
            inner.issued += 1;
            inner.issued
        };
        let _loading = Release {
            inner: &self.inner,
            flag: Flag::Loading {
                generation,
                latest_only: self.listing_order == ListingOrder::LastIssued,
            },
        };

        let result = match self.transport.execute(self.client.build_list_tasks()).await {
            Ok(response) => self.client.parse_list_tasks(response),
            Err(e) => Err(e),
        };
        self.apply_listing(generation, result);
    }

    fn apply_listing(&self, generation: u64, result: Result<Vec<Task>, ApiError>) {
        let mut inner = self.inner.lock();
        if self.listing_order == ListingOrder::LastIssued && generation != inner.issued {
            debug!(generation, latest = inner.issued, "dropping superseded listing");
            return;
        }
        match result {
            Ok(tasks) => {
                debug!(count = tasks.len(), "task listing replaced");
                inner.state.tasks = tasks;
            }
            Err(e) => {
                error!(error = %e, "failed to load tasks");
                inner.state.error = Some(StoreError::Load);
            }
        }
    }

    /// Create a task from `draft`. Returns `true` once the server accepted
    /// it and the collection has been re-listed.
    #[tracing::instrument(skip(self, draft))]
    pub async fn create_task(&self, draft: &TaskFormData) -> bool {
        if draft.title_is_blank() {
            self.set_error(StoreError::EmptyTitle);
            return false;
        }
        let _submitting = self.begin_submit();
        let request = self.client.build_create_task(&CreateTask::from(draft));
        self.submit_form(request, |server_message| StoreError::Create { server_message })
            .await
    }

    /// Replace the title and description of task `id`.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_task(&self, id: i64, draft: &TaskFormData) -> bool {
        if draft.title_is_blank() {
            self.set_error(StoreError::EmptyTitle);
            return false;
        }
        let _submitting = self.begin_submit();
        let request = self.client.build_update_task(id, &UpdateTask::from(draft));
        self.submit_form(request, |server_message| StoreError::Update { server_message })
            .await
    }

    /// Flip the completion flag of task `id`. Does not touch `submitting`
    /// and does not clear a previous error.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_task(&self, id: i64) {
        match self.execute_checked(self.client.build_toggle_task(id)).await {
            Ok(()) => self.fetch_tasks().await,
            Err(e) => {
                error!(id, error = %e, "failed to toggle task");
                self.set_error(StoreError::Update {
                    server_message: None,
                });
            }
        }
    }

    /// Remove task `id`. Does not clear a previous error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: i64) {
        match self.execute_checked(self.client.build_delete_task(id)).await {
            Ok(()) => self.fetch_tasks().await,
            Err(e) => {
                error!(id, error = %e, "failed to delete task");
                self.set_error(StoreError::Delete);
            }
        }
    }

    async fn submit_form(
        &self,
        request: Result<HttpRequest, ApiError>,
        category: impl FnOnce(Option<String>) -> StoreError,
    ) -> bool {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "failed to encode task payload");
                self.set_error(category(None));
                return false;
            }
        };

        debug!(method = request.method.as_str(), path = %request.path, "sending task form");
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) if e.is_transport() => {
                error!(error = %e, "task request did not complete");
                self.set_error(StoreError::Connection);
                return false;
            }
            Err(e) => {
                warn!(error = %e, "task request rejected");
                self.set_error(category(e.server_message()));
                return false;
            }
        };

        if let Err(e) = check_success(&response) {
            warn!(status = response.status, error = %e, "task request rejected");
            self.set_error(category(e.server_message()));
            return false;
        }

        self.fetch_tasks().await;
        true
    }

    async fn execute_checked(&self, request: HttpRequest) -> Result<(), ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending task request");
        let response = self.transport.execute(request).await?;
        check_success(&response)
    }

    fn begin_submit(&self) -> Release<'_> {
        let mut inner = self.inner.lock();
        inner.state.submitting = true;
        inner.state.error = None;
        Release {
            inner: &self.inner,
            flag: Flag::Submitting,
        }
    }

    fn set_error(&self, error: StoreError) {
        self.inner.lock().state.error = Some(error);
    }
}

enum Flag {
    Loading { generation: u64, latest_only: bool },
    Submitting,
}

/// Clears its flag when dropped.
struct Release<'a> {
    inner: &'a Mutex<Inner>,
    flag: Flag,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        match self.flag {
            // A superseded listing leaves the flag to the newer one.
            Flag::Loading {
                generation,
                latest_only,
            } => {
                if !latest_only || generation == inner.issued {
                    inner.state.loading = false;
                }
            }
            Flag::Submitting => inner.state.submitting = false,
        }
    }
}
