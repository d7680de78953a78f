use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use taskflow_core::{Category, Priority, Task, TaskDraft};

/// Field values of the create/edit form. The due date is date-only and is
/// read and written as a calendar day in the user's time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub category: Category,
}

/// The first instant of `day` in `tz`, as UTC.
///
/// If midnight falls in a DST gap the first existing instant after it is used.
fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + chrono::Duration::hours(hours)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

impl TaskForm {
    /// An empty form due the day after `now`, in `now`'s time zone.
    pub fn blank<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: (now + chrono::Duration::hours(24)).date_naive(),
            priority: Priority::default(),
            category: Category::default(),
        }
    }

    /// A form pre-filled from `task`, with its due date reduced to the local day.
    pub fn from_task(task: &Task) -> Self {
        Self::from_task_in(task, &Local)
    }

    /// Like [`TaskForm::from_task`], reducing the due date to a day in `tz`.
    pub fn from_task_in<Tz: TimeZone>(task: &Task, tz: &Tz) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.with_timezone(tz).date_naive(),
            priority: task.priority,
            category: task.category.clone(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Converts the form into a draft due at the start of the chosen local day.
    pub fn to_draft(&self, completed: bool) -> TaskDraft {
        self.to_draft_in(completed, &Local)
    }

    /// Like [`TaskForm::to_draft`], with the day interpreted in `tz`.
    pub fn to_draft_in<Tz: TimeZone>(&self, completed: bool, tz: &Tz) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: start_of_day(self.due_date, tz),
            priority: self.priority,
            completed,
            category: self.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use taskflow_core::stats::TaskStats;

    fn new_york() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn task_due(due_date: DateTime<Utc>) -> Task {
        Task {
            id: "1".to_string(),
            title: "Review".to_string(),
            description: "PR #12".to_string(),
            due_date,
            priority: Priority::High,
            completed: false,
            category: Category::Work,
            created_on: None,
            modified_on: None,
        }
    }

    #[test]
    fn blank_form_is_due_tomorrow_with_defaults() {
        let now = Local.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

        let form = TaskForm::blank(now);

        assert_eq!(form.title, "");
        assert_eq!(form.description, "");
        assert_eq!(form.due_date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(form.priority, Priority::Medium);
        assert_eq!(form.category, Category::Personal);
    }

    #[test]
    fn draft_is_due_at_the_start_of_the_chosen_day() {
        let mut form = TaskForm::blank(Utc::now());
        form.title = "Pay rent".to_string();
        form.due_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        let utc = form.to_draft_in(true, &Utc);
        let west = form.to_draft_in(true, &new_york());

        assert_eq!(utc.title, "Pay rent");
        assert!(utc.completed);
        assert_eq!(utc.due_date, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(west.due_date, Utc.with_ymd_and_hms(2024, 7, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn from_task_copies_fields_and_uses_the_local_day() {
        let due = new_york().with_ymd_and_hms(2024, 6, 10, 22, 30, 0).unwrap();

        let form = TaskForm::from_task_in(&task_due(due.with_timezone(&Utc)), &new_york());

        assert_eq!(form.title, "Review");
        assert_eq!(form.description, "PR #12");
        assert_eq!(form.due_date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.category, Category::Work);
    }

    #[test]
    fn unchanged_edit_keeps_the_due_day_west_of_utc() {
        // Arrange
        let tz = new_york();
        let task = task_due(Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());
        let day = task.due_date.with_timezone(&tz).date_naive();

        // Act
        let first = TaskForm::from_task_in(&task, &tz).to_draft_in(false, &tz);
        let resaved =
            TaskForm::from_task_in(&task_due(first.due_date), &tz).to_draft_in(false, &tz);

        // Assert
        assert_eq!(first.due_date.with_timezone(&tz).date_naive(), day);
        assert_eq!(resaved.due_date, first.due_date);
    }

    #[test]
    fn task_created_for_tomorrow_is_not_due_today() {
        // Arrange
        let tz = new_york();
        let now = tz.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let mut form = TaskForm::blank(now);
        form.title = "Call the bank".to_string();

        // Act
        let draft = form.to_draft_in(false, &tz);
        let stats = TaskStats::compute_in(&[task_due(draft.due_date)], now.date_naive(), &tz);

        // Assert
        assert_eq!(
            draft.due_date.with_timezone(&tz).date_naive(),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
        assert_eq!(stats.due_today, 0);
    }
}
