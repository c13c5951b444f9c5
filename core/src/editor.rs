//! Draft buffer shared by the create and edit forms.
//!
//! `TaskEditor` is pure state wiring: it decides whether a submit means
//! create or update and resets itself after a successful one. Validation and
//! I/O belong to `TaskStore`.

use crate::store::TaskStore;
use crate::transport::Transport;
use crate::types::{Task, TaskFormData};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEditor {
    draft: TaskFormData,
    /// `None` means the form creates a new task.
    editing: Option<i64>,
}

impl TaskEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &TaskFormData {
        &self.draft
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Load task `id` from `tasks` into the draft and switch to edit mode.
    /// Returns `false`, leaving the editor untouched, if `id` is not listed.
    pub fn start_edit(&mut self, tasks: &[Task], id: i64) -> bool {
        let Some(task) = tasks.iter().find(|t| t.id == id) else {
            return false;
        };
        self.draft = TaskFormData::from(task);
        self.editing = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.reset();
    }

    /// Create or update depending on the mode. The draft and edit mode are
    /// only cleared when the store reports success.
    pub async fn submit<T: Transport>(&mut self, store: &TaskStore<T>) -> bool {
        let ok = match self.editing {
            None => store.create_task(&self.draft).await,
            Some(id) => store.update_task(id, &self.draft).await,
        };
        if ok {
            self.reset();
        }
        ok
    }

    fn reset(&mut self) {
        self.draft = TaskFormData::default();
        self.editing = None;
    }
}
