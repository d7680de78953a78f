//! Client abstraction for the remote record store.
//!
//! The store is a generic collection-based persistence service: it knows
//! nothing about tasks, only named collections of field/value records. The
//! [`RecordStore`] trait keeps the repository independent of how the store is
//! reached; [`http::HttpRecordStore`] talks to it over HTTP.

use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskflow_core::Record;
use thiserror::Error;

#[cfg(feature = "http")]
pub mod http;

/// Errors raised while talking to the record store.
#[derive(Error, Debug)]
pub enum RecordStoreError {
    /// The request never produced a response.
    #[cfg(feature = "http")]
    #[error("Request to the record store failed")]
    Request(#[from] reqwest::Error),
    /// The store answered with a non-success status.
    #[error("Record store rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// The response body did not have the expected shape.
    #[error("Malformed record store response: {0}")]
    Malformed(String),
}

/// Trait for the operations the record store offers on a collection.
#[automock]
pub trait RecordStore {
    /// Fetches records from `collection` constrained by `params`.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection to read from.
    /// * `params` - Fields to return, paging, ordering and an optional filter group.
    ///
    /// # Returns
    ///
    /// A `Result` containing the matching records in the requested order, or a
    /// `RecordStoreError` if the store could not be reached or rejected the query.
    async fn fetch_records(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordStoreError>;

    /// Creates a record and returns it as stored, including server-assigned fields.
    async fn create_record(
        &self,
        collection: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError>;

    /// Writes the given fields onto the record with `id` and returns it as stored.
    /// Fields absent from `record` are left untouched.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection holding the record.
    /// * `id` - The record's identifier.
    /// * `record` - The fields to write.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated record, or `RecordStoreError::Rejected`
    /// if no record with `id` exists.
    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError>;

    /// Removes the record with `id`. Succeeds with no value.
    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), RecordStoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    async fn fetch_records(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordStoreError> {
        (**self).fetch_records(collection, params).await
    }

    async fn create_record(
        &self,
        collection: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError> {
        (**self).create_record(collection, record).await
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError> {
        (**self).update_record(collection, id, record).await
    }

    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), RecordStoreError> {
        (**self).delete_record(collection, id).await
    }
}

/// Query parameters for [`RecordStore::fetch_records`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub fields: Vec<String>,
    pub paging_info: PagingInfo,
    pub order_by: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// A set of conditions combined with a single logical operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub logic: Logic,
    pub filters: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fetch_params_serialize_with_wire_names() {
        // Arrange
        let params = FetchParams {
            fields: vec!["Id".to_string(), "title".to_string()],
            paging_info: PagingInfo {
                limit: 100,
                offset: 0,
            },
            order_by: vec![OrderBy {
                field: "CreatedOn".to_string(),
                direction: Direction::Desc,
            }],
            filter: Some(FilterGroup {
                logic: Logic::And,
                filters: vec![Condition {
                    field: "completed".to_string(),
                    operator: Operator::Eq,
                    value: json!(true),
                }],
            }),
        };

        // Act
        let value = serde_json::to_value(&params).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "fields": ["Id", "title"],
                "pagingInfo": { "limit": 100, "offset": 0 },
                "orderBy": [{ "field": "CreatedOn", "direction": "desc" }],
                "filter": {
                    "logic": "and",
                    "filters": [{ "field": "completed", "operator": "eq", "value": true }]
                }
            })
        );
    }

    #[test]
    fn fetch_params_omit_absent_filter() {
        let params = FetchParams {
            fields: vec![],
            paging_info: PagingInfo {
                limit: 10,
                offset: 0,
            },
            order_by: vec![],
            filter: None,
        };

        let value = serde_json::to_value(&params).unwrap();

        assert!(value.get("filter").is_none());
    }
}
