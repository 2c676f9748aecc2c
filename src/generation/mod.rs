//! Generation Invoker — remote text-to-speech and text-to-image calls.
//!
//! This module provides:
//! * [`GenerationClient`] — async trait the pipelines call.
//! * [`ApiGenerationClient`] — OpenAI-compatible REST implementation.
//! * [`Voice`] — narration voice selector for the audio pipeline.
//! * [`GenerationRequest`] — validated prompt + optional voice.
//! * [`GenerationError`] — error variants for generation calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use podcast_assets::config::AppConfig;
//! use podcast_assets::generation::{ApiGenerationClient, GenerationClient, Voice};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = ApiGenerationClient::from_config(&config.generation);
//!
//!     let mp3 = client
//!         .generate_audio(Voice::Alloy.as_str(), "Welcome to the show")
//!         .await
//!         .unwrap();
//!     println!("{} bytes of audio", mp3.len());
//! }
//! ```

pub mod client;
pub mod request;
pub mod voice;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiGenerationClient, GenerationClient, GenerationError};
pub use request::GenerationRequest;
pub use voice::{UnknownVoice, Voice};

// test-only re-export so the pipeline tests can share one double.
#[cfg(test)]
pub use client::{GenerationCall, MockGenerationClient};
