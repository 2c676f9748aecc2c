//! Asset pipelines: generate → package → publish → resolve.
//!
//! Two independent instances share one shape:
//!
//! ```text
//! AudioPipeline::generate(prompt, voice)
//!   └─▶ GenerationClient::generate_audio     ─┐
//!                                              ├─▶ GeneratedAsset ─▶ Publisher ─▶ URL
//! ImagePipeline::run(ImageSource)             │     (package)        (upload +
//!   ├─ AiGenerated  ─▶ generate_thumbnail    ─┤                       resolve)
//!   └─ DirectUpload ─▶ LocalFile::read       ─┘
//!
//! SharedAssetState (Arc<Mutex<AssetState>>) ←── read by the owning form
//! ```
//!
//! Every cycle moves `Busy → Ready | Failed` and emits exactly one
//! notification. The two pipelines own disjoint state and can run
//! concurrently.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use podcast_assets::config::AppConfig;
//! use podcast_assets::generation::{ApiGenerationClient, GenerationClient, Voice};
//! use podcast_assets::notify::{LogNotifier, Notifier};
//! use podcast_assets::pipeline::{AudioPipeline, ImagePipeline};
//! use podcast_assets::storage::{HttpStorageClient, StorageClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generation: Arc<dyn GenerationClient> =
//!         Arc::new(ApiGenerationClient::from_config(&config.generation));
//!     let storage: Arc<dyn StorageClient> =
//!         Arc::new(HttpStorageClient::from_config(&config.storage));
//!     let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
//!
//!     let audio = AudioPipeline::new(generation.clone(), storage.clone(), notifier.clone());
//!     let image = ImagePipeline::new(generation, storage, notifier);
//!
//!     let (clip, thumb) = tokio::join!(
//!         audio.generate("Episode one: tide pools", Some(Voice::Fable)),
//!         image.generate("tide pool at dawn, watercolor"),
//!     );
//!     println!("{clip:?} {thumb:?}");
//! }
//! ```

pub mod audio;
mod cycle;
pub mod error;
pub mod image;
pub mod publisher;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use audio::AudioPipeline;
pub use error::{FailureKind, PipelineError};
pub use image::{ImageMode, ImagePipeline, ImageSource};
pub use publisher::{PublishedAsset, Publisher};
pub use state::{new_shared_state, AssetState, PipelineState, SharedAssetState};
