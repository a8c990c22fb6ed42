//! Client for Granola's undocumented REST API.
//!
//! Two endpoints only: paginated document listing and on-demand transcript
//! fetch. Single attempt per call, no retries; callers surface failures as
//! readable messages.

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::cache::TranscriptSegment;

const API_BASE: &str = "https://api.granola.ai/v2";
const PAGE_SIZE: usize = 100;

pub struct ApiClient {
    client: Client,
    token: SecretString,
    base_url: String,
}

impl ApiClient {
    pub fn new(token: SecretString) -> Self {
        Self { client: Client::new(), token, base_url: API_BASE.to_string() }
    }

    /// List up to `limit` documents, newest first, following pagination
    /// cursors until the limit is reached or the server stops returning one.
    pub async fn list_documents(&self, limit: usize) -> Result<Vec<Value>> {
        let mut docs = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = list_request_body(limit.saturating_sub(docs.len()), cursor.as_deref());
            debug!("requesting document page (have {})", docs.len());
            let response = self
                .post("get-documents", body)
                .await
                .context("failed to list documents from the Granola API")?;

            let page = response
                .get("docs")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let page_len = page.len();
            docs.extend(page);

            cursor = response
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string);
            if docs.len() >= limit || cursor.is_none() || page_len == 0 {
                break;
            }
        }

        docs.truncate(limit);
        info!("fetched {} documents from the API", docs.len());
        Ok(docs)
    }

    /// Fetch the transcript for one document as an ordered segment list.
    pub async fn fetch_transcript(&self, document_id: &str) -> Result<Vec<TranscriptSegment>> {
        let response = self
            .post("get-document-transcript", json!({ "document_id": document_id }))
            .await
            .with_context(|| format!("failed to fetch transcript for {}", document_id))?;

        // The endpoint returns either a bare segment array or {"transcript": [...]}.
        let segments = match response {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("transcript") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(segments
            .into_iter()
            .filter_map(|seg| serde_json::from_value(seg).ok())
            .collect())
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Granola API returned {} for {}", status, endpoint));
        }
        response.json::<Value>().await.context("Granola API returned non-JSON body")
    }
}

/// Request body for one page of the document listing.
fn list_request_body(remaining: usize, cursor: Option<&str>) -> Value {
    let mut body = json!({ "limit": remaining.min(PAGE_SIZE) });
    if let Some(cursor) = cursor {
        body["cursor"] = json!(cursor);
    }
    body
}
