use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier assigned by the record store when a task is created.
pub type TaskId = String;

/// A single unit of work owned by the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub completed: bool,
    pub category: Category,
    /// Server-assigned, read-only.
    pub created_on: Option<DateTime<Utc>>,
    /// Server-assigned, read-only.
    pub modified_on: Option<DateTime<Utc>>,
}

impl Task {
    /// Returns true when the due date falls on `day` in local time.
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.is_due_on_in(day, &Local)
    }

    /// Returns true when the due date falls on `day` in `tz`.
    pub fn is_due_on_in<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> bool {
        self.due_date.with_timezone(tz).date_naive() == day
    }

    /// Builds the full-field draft used to replace this task on the server.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            priority: self.priority,
            completed: self.completed,
            category: self.category.clone(),
        }
    }
}

/// The caller-supplied, mutable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub completed: bool,
    pub category: Category,
}

impl TaskDraft {
    /// Creates a draft with the given title and every other field at its default.
    /// The due date defaults to 24 hours after `now`.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: now + chrono::Duration::hours(24),
            priority: Priority::default(),
            completed: false,
            category: Category::default(),
        }
    }

    /// A draft may only be persisted when its title has visible content.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// How urgent a task is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight: high sorts before medium, medium before low.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// The lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown priority '{0}'")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        write!(f, "{}", label)
    }
}

/// Grouping for a task. Unknown categories are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Category {
    #[default]
    Personal,
    Work,
    Other(String),
}

impl Category {
    /// The name used on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Other(name) => name,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "personal" => Category::Personal,
            "work" => Category::Work,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "personal" => Category::Personal,
            "work" => Category::Work,
            _ => Category::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Personal => write!(f, "Personal"),
            Category::Work => write!(f, "Work"),
            Category::Other(name) => write!(f, "{}", name),
        }
    }
}
