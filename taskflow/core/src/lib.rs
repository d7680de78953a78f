//! Core domain models and task-list logic for TaskFlow.
pub mod normalize;
pub mod stats;
pub mod task;
pub mod view;

pub use normalize::{NormalizeError, Record};
pub use stats::{CategoryCounts, PriorityCounts, TaskStats};
pub use task::{Category, Priority, Task, TaskDraft, TaskId};
pub use view::{Filter, SortOrder};
