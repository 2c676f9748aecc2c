//! Core `GenerationClient` trait and `ApiGenerationClient` implementation.
//!
//! `ApiGenerationClient` calls any OpenAI-compatible speech and image
//! endpoint. All connection details come from [`GenerationConfig`]; nothing
//! is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GenerationConfig;

// ---------------------------------------------------------------------------
// GenerationError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating an asset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("generation request timed out")]
    Timeout,

    /// The service answered with a non-success status code.
    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse generation response: {0}")]
    Parse(String),

    /// The service returned no usable content.
    #[error("generation service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationClient trait
// ---------------------------------------------------------------------------

/// Async trait for the remote text-to-speech and text-to-image calls.
///
/// Implementors must be `Send + Sync` so they can be shared between the
/// audio and image pipelines behind an `Arc<dyn GenerationClient>`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Synthesize `input` with the given `voice`; returns encoded audio bytes.
    async fn generate_audio(&self, voice: &str, input: &str) -> Result<Vec<u8>, GenerationError>;

    /// Render a thumbnail for `prompt`; returns encoded image bytes.
    async fn generate_thumbnail(&self, prompt: &str) -> Result<Vec<u8>, GenerationError>;
}

// ---------------------------------------------------------------------------
// ApiGenerationClient
// ---------------------------------------------------------------------------

/// Calls OpenAI-compatible `/v1/audio/speech` and `/v1/images/generations`.
pub struct ApiGenerationClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl ApiGenerationClient {
    /// Build an `ApiGenerationClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`. A default client is used if the builder fails.
    pub fn from_config(config: &GenerationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach `Authorization: Bearer …` only for a non-empty api key.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => req.bearer_auth(key),
            _ => req,
        }
    }
}

/// Turn a non-2xx response into [`GenerationError::Status`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GenerationError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_bytes(response: reqwest::Response) -> Result<Vec<u8>, GenerationError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(bytes.to_vec())
}

#[async_trait]
impl GenerationClient for ApiGenerationClient {
    async fn generate_audio(&self, voice: &str, input: &str) -> Result<Vec<u8>, GenerationError> {
        let body = serde_json::json!({
            "model": self.config.speech_model,
            "voice": voice,
            "input": input,
            "response_format": "mp3"
        });

        log::debug!(
            "generation: speech request (voice={voice}, {} chars)",
            input.chars().count()
        );

        let req = self
            .client
            .post(self.endpoint("/v1/audio/speech"))
            .json(&body);
        let response = ensure_success(self.authorize(req).send().await?).await?;
        read_bytes(response).await
    }

    /// The image endpoint answers with a short-lived URL; the bytes are
    /// fetched from it in a second request.
    async fn generate_thumbnail(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let body = serde_json::json!({
            "model": self.config.image_model,
            "prompt": prompt,
            "size": self.config.image_size,
            "quality": self.config.image_quality,
            "n": 1
        });

        let req = self
            .client
            .post(self.endpoint("/v1/images/generations"))
            .json(&body);
        let response = ensure_success(self.authorize(req).send().await?).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let image_url = json["data"][0]["url"]
            .as_str()
            .filter(|u| !u.is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        log::debug!("generation: fetching rendered thumbnail");

        let response = ensure_success(self.client.get(image_url).send().await?).await?;
        read_bytes(response).await
    }
}

// ---------------------------------------------------------------------------
// MockGenerationClient  (test-only)
// ---------------------------------------------------------------------------

/// A call observed by [`MockGenerationClient`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationCall {
    Audio { voice: String, input: String },
    Thumbnail { prompt: String },
}

/// A test double that returns a pre-configured response for both calls and
/// records every invocation.
#[cfg(test)]
pub struct MockGenerationClient {
    response: Result<Vec<u8>, GenerationError>,
    calls: std::sync::Mutex<Vec<GenerationCall>>,
}

#[cfg(test)]
impl MockGenerationClient {
    /// Create a mock that always returns `Ok(bytes)`.
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            response: Ok(bytes),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: GenerationError) -> Self {
        Self {
            response: Err(error),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate_audio(&self, voice: &str, input: &str) -> Result<Vec<u8>, GenerationError> {
        self.calls.lock().unwrap().push(GenerationCall::Audio {
            voice: voice.to_string(),
            input: input.to_string(),
        });
        self.response.clone()
    }

    async fn generate_thumbnail(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        self.calls.lock().unwrap().push(GenerationCall::Thumbnail {
            prompt: prompt.to_string(),
        });
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
