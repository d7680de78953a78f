use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use taskflow_client::record_store::{FetchParams, RecordStore, RecordStoreError};
use taskflow_core::Record;
use taskflow_core::normalize::{field, format_timestamp};

/// Record store double that keeps records in memory and assigns ids and
/// creation timestamps the way the real service does.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RefCell<Vec<Record>>,
    next_id: Cell<u64>,
    pub fail_deletes: Cell<bool>,
    pub update_calls: Cell<usize>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    fn not_found(id: &str) -> RecordStoreError {
        RecordStoreError::Rejected {
            status: 404,
            message: format!("Record {} not found", id),
        }
    }

    fn matches_id(record: &Record, id: &str) -> bool {
        match record.get(field::ID) {
            Some(Value::Number(n)) => n.to_string() == id,
            Some(Value::String(s)) => s == id,
            _ => false,
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    async fn fetch_records(
        &self,
        _collection: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordStoreError> {
        let mut records: Vec<Record> = self
            .records
            .borrow()
            .iter()
            .filter(|record| {
                params.filter.as_ref().is_none_or(|group| {
                    group
                        .filters
                        .iter()
                        .all(|condition| record.get(&condition.field) == Some(&condition.value))
                })
            })
            .cloned()
            .collect();
        // Ids grow with creation time, so newest first is highest id first.
        records.reverse();
        records.truncate(params.paging_info.limit as usize);
        Ok(records)
    }

    async fn create_record(
        &self,
        _collection: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let created_on = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(id as i64);

        let mut stored = record.clone();
        stored.insert(field::ID.to_string(), Value::from(id));
        stored.insert(
            field::CREATED_ON.to_string(),
            Value::String(format_timestamp(created_on)),
        );
        stored.insert(
            field::MODIFIED_ON.to_string(),
            Value::String(format_timestamp(created_on)),
        );
        self.records.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    async fn update_record(
        &self,
        _collection: &str,
        id: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError> {
        self.update_calls.set(self.update_calls.get() + 1);
        let mut records = self.records.borrow_mut();
        let stored = records
            .iter_mut()
            .find(|stored| Self::matches_id(stored, id))
            .ok_or_else(|| Self::not_found(id))?;
        for (name, value) in record {
            stored.insert(name.clone(), value.clone());
        }
        Ok(stored.clone())
    }

    async fn delete_record(&self, _collection: &str, id: &str) -> Result<(), RecordStoreError> {
        if self.fail_deletes.get() {
            return Err(RecordStoreError::Rejected {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|record| !Self::matches_id(record, id));
        if records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
