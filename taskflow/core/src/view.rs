//! Filter and sort derivation applied to the task list before it is shown.

use crate::task::Task;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which tasks the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

/// The order the filtered list is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SortOrder {
    /// Earliest due date first.
    #[default]
    DueDate,
    /// Highest priority first.
    Priority,
}

/// Filters `tasks`, then sorts the survivors. Both sorts are stable, so ties
/// keep their original relative order.
pub fn visible_tasks(tasks: &[Task], filter: Filter, sort_order: SortOrder) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();
    match sort_order {
        SortOrder::DueDate => visible.sort_by_key(|task| task.due_date),
        SortOrder::Priority => {
            visible.sort_by_key(|task| std::cmp::Reverse(task.priority.weight()))
        }
    }
    visible
}
