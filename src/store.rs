//! Client for the real-time data store.
//!
//! The store is reached through its REST interface: `GET {base}/{path}.json`
//! returns the JSON stored at `path`, or `null` when nothing is there. A
//! [`StoreClient`] is built once at startup and cloned into every consumer;
//! clones share one connection pool.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

use crate::Config;

// ---

#[derive(Debug, Clone)]
pub struct StoreClient {
    // ---
    client: reqwest::Client,
    base_url: String,
    auth: Option<String>,
    path_latest: String,
    path_history: String,
}

impl StoreClient {
    // ---
    pub fn new(
        base_url: &str,
        auth: Option<String>,
        path_latest: &str,
        path_history: &str,
        timeout: Duration,
    ) -> Result<Self> {
        // ---
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build store client: {}", e))?;

        Ok(StoreClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            path_latest: path_latest.trim_matches('/').to_string(),
            path_history: path_history.trim_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            &cfg.store_url,
            cfg.store_auth.clone(),
            &cfg.path_latest,
            &cfg.path_history,
            cfg.store_timeout,
        )
    }

    /// REST URL of a store path, without credentials.
    pub fn path_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    /// Read the raw JSON stored at `path`.
    pub async fn fetch(&self, path: &str) -> Result<Value> {
        // ---
        let url = self.path_url(path);
        tracing::debug!("Fetching store path: {}", url);

        let mut request = self.client.get(&url);
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Store request to '{}' failed: {}", url, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Store returned {} for '{}'", status, url));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| anyhow!("Store returned invalid JSON for '{}': {}", url, e.without_url()))
    }

    /// Latest reading record, `None` when the store holds nothing usable.
    pub async fn fetch_latest(&self) -> Result<Option<Map<String, Value>>> {
        // ---
        match self.fetch(&self.path_latest).await? {
            Value::Object(record) if !record.is_empty() => Ok(Some(record)),
            Value::Null | Value::Object(_) => Ok(None),
            other => {
                tracing::debug!("Latest reading is not a record: {}", other);
                Ok(None)
            }
        }
    }

    /// History snapshot, `None` when the path is empty.
    pub async fn fetch_history(&self) -> Result<Option<Value>> {
        // ---
        match self.fetch(&self.path_history).await? {
            Value::Null => Ok(None),
            snapshot => Ok(Some(snapshot)),
        }
    }
}
