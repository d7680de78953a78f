//! Dashboard statistics derived from a task collection.

use crate::task::{Category, Priority, Task};
use chrono::{Local, NaiveDate, TimeZone};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Only the two built-in categories are tallied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryCounts {
    pub personal: usize,
    pub work: usize,
}

/// Counts shown on the dashboard. Recomputed from scratch on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub due_today: usize,
    pub by_priority: PriorityCounts,
    pub by_category: CategoryCounts,
}

impl TaskStats {
    /// Computes the statistics relative to the current local calendar day.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self::compute(tasks, Local::now().date_naive())
    }

    /// Computes the statistics in a single pass, with `today` as the local
    /// calendar day used for the due-today count.
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        Self::compute_in(tasks, today, &Local)
    }

    /// Like [`TaskStats::compute`], with `today` being a calendar day in `tz`.
    pub fn compute_in<Tz: TimeZone>(tasks: &[Task], today: NaiveDate, tz: &Tz) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            if task.completed {
                stats.completed += 1;
            } else if task.is_due_on_in(today, tz) {
                stats.due_today += 1;
            }

            match task.priority {
                Priority::High => stats.by_priority.high += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::Low => stats.by_priority.low += 1,
            }

            match task.category {
                Category::Personal => stats.by_category.personal += 1,
                Category::Work => stats.by_category.work += 1,
                Category::Other(_) => {}
            }
        }

        stats.active = stats.total - stats.completed;
        stats
    }

    /// Rounded share of completed tasks, 0 for an empty collection.
    pub fn completion_percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, priority: Priority, completed: bool, category: Category) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            due_date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            priority,
            completed,
            category,
            created_on: None,
            modified_on: None,
        }
    }

    fn due_locally_on(mut task: Task, day: NaiveDate, hour: u32) -> Task {
        let local = Local
            .from_local_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
            .earliest()
            .unwrap();
        task.due_date = local.with_timezone(&Utc);
        task
    }

    #[test]
    fn empty_collection_has_zero_counts_and_zero_percent() {
        let stats = TaskStats::compute(&[], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.completion_percentage(), 0);
    }

    #[test]
    fn counts_completion_priority_and_category() {
        // Arrange
        let tasks = vec![
            task("1", Priority::High, false, Category::Work),
            task("2", Priority::Low, true, Category::Personal),
            task("3", Priority::Medium, true, Category::Other("errands".into())),
        ];

        // Act
        let stats = TaskStats::compute(&tasks, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        // Assert
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.by_priority, PriorityCounts { high: 1, medium: 1, low: 1 });
        assert_eq!(stats.by_category, CategoryCounts { personal: 1, work: 1 });
        assert_eq!(stats.completion_percentage(), 67);
    }

    #[test]
    fn totals_always_add_up() {
        let tasks: Vec<Task> = (0..10)
            .map(|i| {
                let priority = match i % 3 {
                    0 => Priority::High,
                    1 => Priority::Medium,
                    _ => Priority::Low,
                };
                task(&i.to_string(), priority, i % 4 == 0, Category::Personal)
            })
            .collect();

        let stats = TaskStats::compute(&tasks, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        assert_eq!(stats.total, stats.completed + stats.active);
        assert_eq!(
            stats.by_priority.high + stats.by_priority.medium + stats.by_priority.low,
            stats.total
        );
        assert_eq!(stats.by_priority.get(Priority::High), 4);
    }

    #[test]
    fn due_today_counts_only_open_tasks_on_the_local_day() {
        // Arrange
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let tasks = vec![
            due_locally_on(task("1", Priority::High, false, Category::Work), today, 0),
            due_locally_on(task("2", Priority::High, false, Category::Work), today, 23),
            due_locally_on(task("3", Priority::High, true, Category::Work), today, 10),
            due_locally_on(task("4", Priority::High, false, Category::Work), tomorrow, 0),
        ];

        // Act
        let stats = TaskStats::compute(&tasks, today);

        // Assert
        assert_eq!(stats.due_today, 2);
    }

    #[test]
    fn due_today_uses_the_given_zone() {
        // Arrange
        let west = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let mut task = task("1", Priority::High, false, Category::Work);
        task.due_date = Utc.with_ymd_and_hms(2024, 6, 2, 3, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        // Act
        let west_stats = TaskStats::compute_in(std::slice::from_ref(&task), today, &west);
        let utc_stats = TaskStats::compute_in(&[task], today, &Utc);

        // Assert
        assert_eq!(west_stats.due_today, 1);
        assert_eq!(utc_stats.due_today, 0);
    }

    #[test]
    fn mixed_scenario_from_the_dashboard() {
        let mut a = task("a", Priority::High, false, Category::Personal);
        a.due_date = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut b = task("b", Priority::Low, true, Category::Personal);
        b.due_date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let stats = TaskStats::compute(&[a, b], NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());

        assert_eq!(stats.completed, 1);
        assert_eq!(stats.by_priority.high, 1);
        assert_eq!(stats.completion_percentage(), 50);
    }
}
