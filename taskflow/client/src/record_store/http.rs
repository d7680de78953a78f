//! [`RecordStore`] implementation that reaches the store over HTTP.

use super::{FetchParams, RecordStore, RecordStoreError};
use crate::config::Config;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskflow_core::Record;
use tracing::debug;

const PROJECT_HEADER: &str = "X-Project-Id";

/// Every store response wraps its payload in a `data` field.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct RecordBody<'a> {
    record: &'a Record,
}

/// Record store client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key: None,
        }
    }

    /// Sends `api_key` as a bearer token on every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builds a client from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = Self::new(config.record_store_url.clone(), config.project_id.clone());
        match &config.api_key {
            Some(api_key) => store.with_api_key(api_key.clone()),
            None => store,
        }
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/records", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.records_url(collection), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(PROJECT_HEADER, &self.project_id);
        match &self.api_key {
            Some(api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }
}

/// Turns a non-success status into [`RecordStoreError::Rejected`].
async fn ensure_success(response: Response) -> Result<Response, RecordStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RecordStoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, RecordStoreError> {
    let response = ensure_success(response).await?;
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|err| RecordStoreError::Malformed(err.to_string()))?;
    Ok(envelope.data)
}

impl RecordStore for HttpRecordStore {
    #[tracing::instrument(skip(self, params))]
    async fn fetch_records(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordStoreError> {
        let url = format!("{}/query", self.records_url(collection));
        debug!("POST {}", url);
        let response = self
            .authorize(self.client.post(url))
            .json(params)
            .send()
            .await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self, record))]
    async fn create_record(
        &self,
        collection: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError> {
        let url = self.records_url(collection);
        debug!("POST {}", url);
        let response = self
            .authorize(self.client.post(url))
            .json(&RecordBody { record })
            .send()
            .await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self, record))]
    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        record: &Record,
    ) -> Result<Record, RecordStoreError> {
        let url = self.record_url(collection, id);
        debug!("PUT {}", url);
        let response = self
            .authorize(self.client.put(url))
            .json(&RecordBody { record })
            .send()
            .await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), RecordStoreError> {
        let url = self.record_url(collection, id);
        debug!("DELETE {}", url);
        let response = self.authorize(self.client.delete(url)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
