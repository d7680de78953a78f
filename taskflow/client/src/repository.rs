//! Task persistence on top of the generic record store.

use crate::config::Config;
use crate::record_store::{
    Condition, Direction, FetchParams, FilterGroup, Logic, Operator, OrderBy, PagingInfo,
    RecordStore, RecordStoreError,
};
use chrono::Utc;
use mockall::automock;
use serde_json::Value;
use taskflow_core::normalize::{self, field};
use taskflow_core::{NormalizeError, Record, Task, TaskDraft, TaskStats};
use thiserror::Error;
use tracing::{error, info, warn};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Why a repository operation failed.
#[derive(Error, Debug)]
pub enum Cause {
    #[error(transparent)]
    Store(#[from] RecordStoreError),
    #[error(transparent)]
    Record(#[from] NormalizeError),
}

/// One error per repository operation, each wrapping the underlying [`Cause`].
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Failed to fetch tasks: {0}")]
    Fetch(#[source] Cause),
    #[error("Failed to create task: {0}")]
    Create(#[source] Cause),
    #[error("Failed to update task: {0}")]
    Update(#[source] Cause),
    #[error("Failed to delete task: {0}")]
    Delete(#[source] Cause),
    #[error("Failed to toggle task completion: {0}")]
    Toggle(#[source] Cause),
}

/// Equality constraints on record fields, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    conditions: Vec<(String, Value)>,
}

impl TaskFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the condition `field == value`.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn to_filter_group(&self) -> Option<FilterGroup> {
        if self.is_empty() {
            return None;
        }
        Some(FilterGroup {
            logic: Logic::And,
            filters: self
                .conditions
                .iter()
                .map(|(field, value)| Condition {
                    field: field.clone(),
                    operator: Operator::Eq,
                    value: value.clone(),
                })
                .collect(),
        })
    }
}

/// Trait for the task operations the list and dashboard rely on.
#[automock]
pub trait TaskRepository {
    /// Fetches the most recently created tasks, optionally filtered.
    ///
    /// # Arguments
    ///
    /// * `filters` - Equality constraints on record fields; empty for every task.
    ///
    /// # Returns
    ///
    /// A `Result` containing at most one page of tasks, newest first, or
    /// `TaskError::Fetch` if the store call failed. Records that cannot be
    /// turned into a task are skipped.
    async fn fetch_tasks(&self, filters: &TaskFilters) -> Result<Vec<Task>, TaskError>;

    /// Creates a task and returns it with its server-assigned id.
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskError>;

    /// Replaces every mutable field of the task with `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - The task to replace.
    /// * `draft` - The new title, description, due date, priority, completion
    ///   flag and category.
    ///
    /// # Returns
    ///
    /// A `Result` containing the task as the store now holds it, or
    /// `TaskError::Update` otherwise.
    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<Task, TaskError>;

    /// Deletes the task with `id`.
    async fn delete_task(&self, id: &str) -> Result<(), TaskError>;

    /// Writes only the completion flag of the task with `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - The task to change.
    /// * `completed` - The new value of the flag.
    ///
    /// # Returns
    ///
    /// An empty `Result`, or `TaskError::Toggle` if the store call failed.
    async fn toggle_task_completion(&self, id: &str, completed: bool) -> Result<(), TaskError>;

    /// Computes dashboard statistics over the unfiltered task list.
    async fn get_task_stats(&self) -> Result<TaskStats, TaskError>;
}

/// [`TaskRepository`] that stores tasks as records in one collection.
pub struct RecordTaskRepository<S: RecordStore> {
    store: S,
    collection: String,
    page_size: u32,
}

impl<S: RecordStore> RecordTaskRepository<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.collection.clone()).with_page_size(config.page_size)
    }

    fn fetch_params(&self, filters: &TaskFilters) -> FetchParams {
        FetchParams {
            fields: field::ALL.iter().map(|name| name.to_string()).collect(),
            paging_info: PagingInfo {
                limit: self.page_size,
                offset: 0,
            },
            order_by: vec![OrderBy {
                field: field::CREATED_ON.to_string(),
                direction: Direction::Desc,
            }],
            filter: filters.to_filter_group(),
        }
    }

    async fn try_fetch(&self, filters: &TaskFilters) -> Result<Vec<Task>, Cause> {
        let records = self
            .store
            .fetch_records(&self.collection, &self.fetch_params(filters))
            .await?;
        let now = Utc::now();
        let tasks = records
            .into_iter()
            .filter_map(|record| {
                let id = record.get(field::ID).cloned();
                normalize::normalize(record, now)
                    .inspect_err(|err| warn!("Skipping task record {:?}: {}", id, err))
                    .ok()
            })
            .collect();
        Ok(tasks)
    }

    async fn try_create(&self, draft: &TaskDraft) -> Result<Task, Cause> {
        let record = normalize::draft_to_record(draft);
        let created = self.store.create_record(&self.collection, &record).await?;
        Ok(normalize::normalize(created, Utc::now())?)
    }

    async fn try_update(&self, id: &str, draft: &TaskDraft) -> Result<Task, Cause> {
        let record = normalize::draft_to_record(draft);
        let updated = self
            .store
            .update_record(&self.collection, id, &record)
            .await?;
        Ok(normalize::normalize(updated, Utc::now())?)
    }

    async fn try_toggle(&self, id: &str, completed: bool) -> Result<(), Cause> {
        let patch: Record = normalize::completion_patch(completed);
        self.store
            .update_record(&self.collection, id, &patch)
            .await?;
        Ok(())
    }
}

impl<S: RecordStore> TaskRepository for RecordTaskRepository<S> {
    #[tracing::instrument(skip(self))]
    async fn fetch_tasks(&self, filters: &TaskFilters) -> Result<Vec<Task>, TaskError> {
        let tasks = self.try_fetch(filters).await.map_err(|cause| {
            error!("Error fetching tasks: {}", cause);
            TaskError::Fetch(cause)
        })?;
        info!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskError> {
        self.try_create(draft).await.map_err(|cause| {
            error!("Error creating task: {}", cause);
            TaskError::Create(cause)
        })
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<Task, TaskError> {
        self.try_update(id, draft).await.map_err(|cause| {
            error!("Error updating task: {}", cause);
            TaskError::Update(cause)
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<(), TaskError> {
        self.store
            .delete_record(&self.collection, id)
            .await
            .map_err(|err| {
                error!("Error deleting task: {}", err);
                TaskError::Delete(err.into())
            })
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_task_completion(&self, id: &str, completed: bool) -> Result<(), TaskError> {
        self.try_toggle(id, completed).await.map_err(|cause| {
            error!("Error toggling task completion: {}", cause);
            TaskError::Toggle(cause)
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_task_stats(&self) -> Result<TaskStats, TaskError> {
        let tasks = self.fetch_tasks(&TaskFilters::new()).await?;
        Ok(TaskStats::from_tasks(&tasks))
    }
}
