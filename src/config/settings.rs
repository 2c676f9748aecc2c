//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the HTTP
//! clients at construction time.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::generation::Voice;

/// Environment variable that overrides [`GenerationConfig::api_key`].
pub const API_KEY_ENV: &str = "PODCAST_ASSETS_API_KEY";

/// Environment variable that overrides [`StorageConfig::auth_token`].
pub const STORAGE_TOKEN_ENV: &str = "PODCAST_ASSETS_STORAGE_TOKEN";

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Settings for the text-to-speech / text-to-image service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible API (no trailing `/v1`).
    pub base_url: String,
    /// API key. `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Speech model identifier (e.g. `"tts-1"`).
    pub speech_model: String,
    /// Image model identifier (e.g. `"dall-e-3"`).
    pub image_model: String,
    /// Requested thumbnail size, `WIDTHxHEIGHT`.
    pub image_size: String,
    /// Requested thumbnail quality (`"standard"` or `"hd"`).
    pub image_quality: String,
    /// Voice used when the caller does not pick one.
    pub default_voice: Voice,
    /// Maximum seconds to wait for a single generation request.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            speech_model: "tts-1".into(),
            image_model: "dall-e-3".into(),
            image_size: "1024x1024".into(),
            image_quality: "standard".into(),
            default_voice: Voice::default(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Settings for the managed-storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Deployment URL of the backend (function API lives under `/api`).
    pub deployment_url: String,
    /// Bearer token attached to function calls, when set.
    pub auth_token: Option<String>,
    /// Mutation that hands out a one-shot upload URL.
    pub upload_url_function: String,
    /// Mutation that resolves a storage id to a fetchable URL.
    pub resolve_url_function: String,
    /// Maximum seconds to wait for a single storage request.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            deployment_url: "http://127.0.0.1:3210".into(),
            auth_token: None,
            upload_url_function: "files:generateUploadUrl".into(),
            resolve_url_function: "podcasts:getUrl".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use podcast_assets::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("{}", config.storage.deployment_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation service settings.
    pub generation: GenerationConfig,
    /// Storage backend settings.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay secrets from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.generation.api_key = Some(key);
        }
        if let Some(token) = lookup(STORAGE_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.storage.auth_token = Some(token);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
