//! In-memory task list state and the operations the list view triggers.
//!
//! The controller never mutates its task list ahead of the server: every
//! change is applied only after the repository call it depends on resolves
//! successfully. Failures are logged and turned into notices.

mod form;

pub use form::TaskForm;

use crate::notice::{Notice, Notifier};
use crate::repository::{TaskFilters, TaskRepository};
use chrono::{DateTime, Local};
use taskflow_core::view::visible_tasks;
use taskflow_core::{Filter, SortOrder, Task, TaskId};
use tracing::{error, warn};

pub const LOAD_FAILED: &str = "Failed to load tasks. Please try again.";
pub const SAVE_FAILED: &str = "Failed to save task. Please try again.";
pub const TOGGLE_FAILED: &str = "Failed to update task status. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete task. Please try again.";

/// Whether the list has been loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    /// The last load failed; [`TaskListController::retry`] loads again.
    Failed(String),
}

/// What a form submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The title was blank, nothing was sent.
    Rejected,
    Created(TaskId),
    Updated(TaskId),
    /// The repository call failed; the form stays open.
    Failed,
}

/// What a toggle or delete did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// No task with that id is in the list.
    NotFound,
    /// The repository call failed; the list is unchanged.
    Failed,
}

pub struct TaskListController<R: TaskRepository, N: Notifier> {
    repository: R,
    notifier: N,
    tasks: Vec<Task>,
    status: ListStatus,
    filter: Filter,
    sort_order: SortOrder,
    form: TaskForm,
    is_form_open: bool,
    editing_task: Option<Task>,
}

impl<R: TaskRepository, N: Notifier> TaskListController<R, N> {
    pub fn new(repository: R, notifier: N) -> Self {
        Self {
            repository,
            notifier,
            tasks: Vec::new(),
            status: ListStatus::Loading,
            filter: Filter::default(),
            sort_order: SortOrder::default(),
            form: TaskForm::blank(Local::now()),
            is_form_open: false,
            editing_task: None,
        }
    }

    /// Tasks in the order the repository returned them, plus later appends.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.sort_order = sort_order;
    }

    /// The filtered, sorted list to render.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        visible_tasks(&self.tasks, self.filter, self.sort_order)
    }

    pub fn is_form_open(&self) -> bool {
        self.is_form_open
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    pub fn editing_task(&self) -> Option<&Task> {
        self.editing_task.as_ref()
    }

    /// Replaces the list with a fresh fetch. On failure the list keeps its
    /// previous contents and the status becomes [`ListStatus::Failed`].
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) {
        self.status = ListStatus::Loading;
        match self.repository.fetch_tasks(&TaskFilters::new()).await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.status = ListStatus::Ready;
            }
            Err(err) => {
                error!("Error fetching tasks: {}", err);
                self.status = ListStatus::Failed(LOAD_FAILED.to_string());
            }
        }
    }

    /// Manual retry after a failed load.
    pub async fn retry(&mut self) {
        self.load().await
    }

    pub fn open_create_form(&mut self) {
        self.open_create_form_at(Local::now());
    }

    /// Opens an empty form due the day after `now`.
    pub fn open_create_form_at(&mut self, now: DateTime<Local>) {
        self.editing_task = None;
        self.form = TaskForm::blank(now);
        self.is_form_open = true;
    }

    /// Opens the form pre-filled from the task with `id`. Returns false if
    /// there is no such task.
    pub fn open_edit_form(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter().find(|task| task.id == id) else {
            warn!("Cannot edit task {}: not in the list", id);
            return false;
        };
        self.form = TaskForm::from_task(task);
        self.editing_task = Some(task.clone());
        self.is_form_open = true;
        true
    }

    pub fn close_form(&mut self) {
        self.is_form_open = false;
    }

    /// Saves the form. Creates a task unless one is being edited, in which
    /// case all of its mutable fields are replaced.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.form.has_title() {
            return SubmitOutcome::Rejected;
        }

        let outcome = match &self.editing_task {
            Some(editing) => {
                let id = editing.id.clone();
                let draft = self.form.to_draft(editing.completed);
                match self.repository.update_task(&id, &draft).await {
                    Ok(updated) => {
                        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
                            *slot = updated;
                        }
                        SubmitOutcome::Updated(id)
                    }
                    Err(err) => {
                        error!("Error saving task: {}", err);
                        SubmitOutcome::Failed
                    }
                }
            }
            None => {
                let draft = self.form.to_draft(false);
                match self.repository.create_task(&draft).await {
                    Ok(created) => {
                        let id = created.id.clone();
                        self.tasks.push(created);
                        SubmitOutcome::Created(id)
                    }
                    Err(err) => {
                        error!("Error saving task: {}", err);
                        SubmitOutcome::Failed
                    }
                }
            }
        };

        if outcome == SubmitOutcome::Failed {
            self.notifier.notify(Notice::error(SAVE_FAILED));
        } else {
            self.is_form_open = false;
        }
        outcome
    }

    /// Flips the completion flag of the task with `id` once the server confirms.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_completion(&mut self, id: &str) -> MutationOutcome {
        let Some(task) = self.tasks.iter().find(|task| task.id == id) else {
            warn!("Cannot toggle task {}: not in the list", id);
            return MutationOutcome::NotFound;
        };
        let completed = !task.completed;

        if let Err(err) = self.repository.toggle_task_completion(id, completed).await {
            error!("Error toggling task completion: {}", err);
            self.notifier.notify(Notice::error(TOGGLE_FAILED));
            return MutationOutcome::Failed;
        }

        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = completed;
                MutationOutcome::Applied
            }
            None => MutationOutcome::NotFound,
        }
    }

    /// Removes the task with `id` once the server confirms the delete.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> MutationOutcome {
        if let Err(err) = self.repository.delete_task(id).await {
            error!("Error deleting task: {}", err);
            self.notifier.notify(Notice::error(DELETE_FAILED));
            return MutationOutcome::Failed;
        }

        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() < before {
            MutationOutcome::Applied
        } else {
            MutationOutcome::NotFound
        }
    }
}
