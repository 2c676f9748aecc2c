//! Configuration module for the podcast asset pipelines.
//!
//! Provides `AppConfig` (top-level settings), one sub-config per remote
//! collaborator, `AppPaths` for the platform config directory, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, GenerationConfig, StorageConfig, API_KEY_ENV, STORAGE_TOKEN_ENV};
