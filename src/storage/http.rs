//! `HttpStorageClient` — talks to the backend's HTTP function API.
//!
//! Function calls go to `POST {deployment}/api/mutation` with
//! `{ "path", "args", "format": "json" }` and answer with either
//! `{ "status": "success", "value": … }` or
//! `{ "status": "error", "errorMessage": … }`. Uploads are a plain `POST` of
//! the raw bytes to the URL handed out by the upload-url function.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::client::{StorageClient, StorageError, StorageReference, UploadDestination};
use crate::asset::GeneratedAsset;
use crate::config::StorageConfig;

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum FunctionResponse {
    Success {
        #[serde(default)]
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage", default)]
        error_message: String,
    },
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "storageId")]
    storage_id: String,
}

/// [`StorageClient`] over the backend's HTTP function API.
pub struct HttpStorageClient {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpStorageClient {
    /// Build an `HttpStorageClient` from application config.
    pub fn from_config(config: &StorageConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn mutation_url(&self) -> String {
        format!(
            "{}/api/mutation",
            self.config.deployment_url.trim_end_matches('/')
        )
    }

    /// Run a backend mutation and return its `value`.
    async fn call_mutation(&self, function: &str, args: Value) -> Result<Value, StorageError> {
        let body = serde_json::json!({
            "path": function,
            "args": args,
            "format": "json"
        });

        let mut req = self.client.post(self.mutation_url()).json(&body);
        if let Some(token) = self.config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            req = req.bearer_auth(token);
        }

        let response = ensure_success(req.send().await?).await?;
        let parsed: FunctionResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(e.to_string()))?;

        match parsed {
            FunctionResponse::Success { value } => Ok(value),
            FunctionResponse::Error { error_message } => {
                log::debug!("storage: function {function} failed: {error_message}");
                Err(StorageError::Function {
                    message: error_message,
                })
            }
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl StorageClient for HttpStorageClient {
    async fn request_upload_target(&self) -> Result<UploadDestination, StorageError> {
        let value = self
            .call_mutation(&self.config.upload_url_function, serde_json::json!({}))
            .await?;

        match value.as_str() {
            Some(url) if !url.is_empty() => Ok(UploadDestination {
                url: url.to_string(),
            }),
            _ => Err(StorageError::Parse(format!(
                "upload URL is not a string: {value}"
            ))),
        }
    }

    async fn upload_file(
        &self,
        destination: &UploadDestination,
        asset: &GeneratedAsset,
    ) -> Result<StorageReference, StorageError> {
        log::debug!(
            "storage: uploading {} ({} bytes, {})",
            asset.file_name(),
            asset.len(),
            asset.mime_type()
        );

        let response = self
            .client
            .post(&destination.url)
            .header(reqwest::header::CONTENT_TYPE, asset.mime_type())
            .body(asset.bytes().to_vec())
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(e.to_string()))?;

        if uploaded.storage_id.is_empty() {
            return Err(StorageError::Parse("empty storageId".into()));
        }
        Ok(StorageReference::new(uploaded.storage_id))
    }

    async fn resolve_url(&self, reference: &StorageReference) -> Result<String, StorageError> {
        let value = self
            .call_mutation(
                &self.config.resolve_url_function,
                serde_json::json!({ "storageId": reference.storage_id }),
            )
            .await?;

        match value {
            Value::String(url) if !url.is_empty() => Ok(url),
            Value::Null | Value::String(_) => {
                Err(StorageError::UrlNotFound(reference.storage_id.clone()))
            }
            other => Err(StorageError::Parse(format!("URL is not a string: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
