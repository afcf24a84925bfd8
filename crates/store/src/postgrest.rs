use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::errors::StoreError;
use crate::filter::Filter;
use crate::TableStore;

/// `TableStore` backed by a Supabase-style PostgREST endpoint, reached over
/// HTTPS with an API key.
#[derive(Clone)]
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PostgrestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &configs::StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self {
            base_url: cfg.url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| StoreError::Network(format!("invalid api key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| StoreError::Network(format!("invalid api key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Read the response as a row array, converting non-2xx statuses into
    /// `StoreError::Http` with the upstream body text preserved.
    async fn rows_from(resp: reqwest::Response) -> Result<Vec<Value>, StoreError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(StoreError::Http { status: status.as_u16(), message });
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        match body {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            single => Ok(vec![single]),
        }
    }
}

#[async_trait::async_trait]
impl TableStore for PostgrestStore {
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
        debug!(table, "store insert");
        let resp = self
            .client
            .post(self.table_url(table))
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::rows_from(resp).await
    }

    async fn select(&self, table: &str, columns: &str, filters: &[Filter])
        -> Result<Vec<Value>, StoreError>
    {
        debug!(table, columns, filter_count = filters.len(), "store select");
        let mut query: Vec<(String, String)> = vec![("select".into(), columns.to_string())];
        query.extend(filters.iter().map(Filter::to_query_pair));
        let resp = self
            .client
            .get(self.table_url(table))
            .headers(self.headers()?)
            .query(&query)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::rows_from(resp).await
    }

    async fn update(&self, table: &str, patch: Value, filters: &[Filter])
        -> Result<Vec<Value>, StoreError>
    {
        debug!(table, filter_count = filters.len(), "store update");
        let query: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();
        let resp = self
            .client
            .patch(self.table_url(table))
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .query(&query)
            .json(&patch)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::rows_from(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_joins_without_double_slash() {
        let s = PostgrestStore::new("https://example.supabase.co/", "key");
        assert_eq!(s.table_url("billing"), "https://example.supabase.co/rest/v1/billing");
    }
}
