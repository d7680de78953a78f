//! Mapping between the record store's generic field/value records and [`Task`].
//!
//! Every read path (fetch, create, update) goes through [`normalize`], so the
//! defaults for missing fields live in exactly one table: [`FIELD_DEFAULTS`].

use crate::task::{Category, Task, TaskDraft};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// A plain field → value record as exchanged with the record store.
pub type Record = Map<String, Value>;

/// Record field names used by the task collection.
pub mod field {
    pub const ID: &str = "Id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const DUE_DATE: &str = "dueDate";
    pub const PRIORITY: &str = "priority";
    pub const COMPLETED: &str = "completed";
    pub const CATEGORY: &str = "category";
    pub const CREATED_ON: &str = "CreatedOn";
    pub const MODIFIED_ON: &str = "ModifiedOn";

    /// Every field requested when fetching tasks.
    pub const ALL: [&str; 9] = [
        ID,
        TITLE,
        DESCRIPTION,
        DUE_DATE,
        PRIORITY,
        COMPLETED,
        CATEGORY,
        CREATED_ON,
        MODIFIED_ON,
    ];
}

/// The value a field takes when the store leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    Flag(bool),
    /// The time of normalization.
    Now,
}

/// Field → default table applied to every record before it becomes a [`Task`].
pub const FIELD_DEFAULTS: [(&str, FieldDefault); 6] = [
    (field::TITLE, FieldDefault::Text("")),
    (field::DESCRIPTION, FieldDefault::Text("")),
    (field::DUE_DATE, FieldDefault::Now),
    (field::PRIORITY, FieldDefault::Text("medium")),
    (field::COMPLETED, FieldDefault::Flag(false)),
    (field::CATEGORY, FieldDefault::Text("personal")),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Record has no Id")]
    MissingId,
    #[error("Field '{field}' has an unexpected value: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("Field '{field}' is not a valid timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Fills every blank (missing, null or empty-string) field from [`FIELD_DEFAULTS`].
pub fn fill_defaults(record: &mut Record, now: DateTime<Utc>) {
    for (name, default) in FIELD_DEFAULTS {
        if !is_blank(record.get(name)) {
            continue;
        }
        let value = match default {
            FieldDefault::Text(text) => Value::String(text.to_string()),
            FieldDefault::Flag(flag) => Value::Bool(flag),
            FieldDefault::Now => Value::String(format_timestamp(now)),
        };
        record.insert(name.to_string(), value);
    }
}

/// Parses the timestamp formats the record store is known to hand back.
///
/// Date-only values are read as UTC midnight; naive date-times as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Formats a timestamp the way it is sent to the record store.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn text(record: &Record, name: &'static str) -> Result<String, NormalizeError> {
    match record.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(NormalizeError::InvalidField {
            field: name,
            value: other.to_string(),
        }),
        None => Ok(String::new()),
    }
}

fn timestamp(record: &Record, name: &'static str) -> Result<Option<DateTime<Utc>>, NormalizeError> {
    match record.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| NormalizeError::InvalidTimestamp {
                field: name,
                value: raw.clone(),
            }),
        Some(other) => Err(NormalizeError::InvalidTimestamp {
            field: name,
            value: other.to_string(),
        }),
    }
}

fn id(record: &Record) -> Result<String, NormalizeError> {
    match record.get(field::ID) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(NormalizeError::MissingId),
    }
}

/// Converts a store record into a [`Task`], defaulting blank fields first.
///
/// An unrecognized priority falls back to the default priority; an
/// unrecognized category is kept verbatim.
pub fn normalize(mut record: Record, now: DateTime<Utc>) -> Result<Task, NormalizeError> {
    fill_defaults(&mut record, now);

    let completed = match record.get(field::COMPLETED) {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(NormalizeError::InvalidField {
                field: field::COMPLETED,
                value: other.to_string(),
            });
        }
        None => false,
    };
    let due_date = timestamp(&record, field::DUE_DATE)?.unwrap_or(now);

    Ok(Task {
        id: id(&record)?,
        title: text(&record, field::TITLE)?,
        description: text(&record, field::DESCRIPTION)?,
        due_date,
        priority: text(&record, field::PRIORITY)?.parse().unwrap_or_default(),
        completed,
        category: Category::from(text(&record, field::CATEGORY)?),
        created_on: timestamp(&record, field::CREATED_ON)?,
        modified_on: timestamp(&record, field::MODIFIED_ON)?,
    })
}

/// The full set of mutable fields, as sent on create and update.
pub fn draft_to_record(draft: &TaskDraft) -> Record {
    let mut record = Record::new();
    record.insert(field::TITLE.into(), Value::String(draft.title.clone()));
    record.insert(
        field::DESCRIPTION.into(),
        Value::String(draft.description.clone()),
    );
    record.insert(
        field::DUE_DATE.into(),
        Value::String(format_timestamp(draft.due_date)),
    );
    record.insert(
        field::PRIORITY.into(),
        Value::String(draft.priority.as_str().to_string()),
    );
    record.insert(field::COMPLETED.into(), Value::Bool(draft.completed));
    record.insert(
        field::CATEGORY.into(),
        Value::String(draft.category.as_str().to_string()),
    );
    record
}

/// A record carrying only the completion flag.
pub fn completion_patch(completed: bool) -> Record {
    let mut record = Record::new();
    record.insert(field::COMPLETED.into(), Value::Bool(completed));
    record
}
