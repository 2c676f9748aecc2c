//! Image pipeline — AI-generated or directly uploaded thumbnails.
//!
//! ```text
//! ImageSource::AiGenerated { prompt } ─▶ generate_thumbnail ─▶ thumbnail-<id>.png ─┐
//! ImageSource::DirectUpload(file)     ─▶ read file          ─▶ original name     ─┤
//!                                                                                  ▼
//!                                                      handle_image: package → publish
//! ```

use std::sync::{Arc, Mutex};

use super::cycle::{run_cycle, Messages};
use super::error::PipelineError;
use super::publisher::{PublishedAsset, Publisher};
use super::state::{lock, new_shared_state, AssetState, PipelineState, SharedAssetState};
use crate::asset::{generated_file_name, AssetKind, GeneratedAsset, IdGenerator, LocalFile, UuidGenerator};
use crate::generation::{GenerationClient, GenerationRequest};
use crate::notify::Notifier;
use crate::storage::{StorageClient, StorageReference};

const MESSAGES: Messages = Messages {
    success: "Thumbnail generated successfully",
    failure: "Error generating thumbnail",
    missing_prompt: "Please provide a prompt to generate the thumbnail",
    unreadable_file: "Error loading the image",
};

/// Which entry point the form currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    AiGenerated,
    #[default]
    DirectUpload,
}

/// Where the next thumbnail comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    AiGenerated { prompt: String },
    DirectUpload(LocalFile),
}

impl ImageSource {
    pub fn mode(&self) -> ImageMode {
        match self {
            ImageSource::AiGenerated { .. } => ImageMode::AiGenerated,
            ImageSource::DirectUpload(_) => ImageMode::DirectUpload,
        }
    }
}

/// Produces the podcast thumbnail and publishes it.
pub struct ImagePipeline {
    generation: Arc<dyn GenerationClient>,
    publisher: Publisher,
    notifier: Arc<dyn Notifier>,
    ids: Arc<dyn IdGenerator>,
    mode: Mutex<ImageMode>,
    state: SharedAssetState,
}

impl ImagePipeline {
    /// Create a pipeline in `Idle`, showing the direct-upload entry point.
    pub fn new(
        generation: Arc<dyn GenerationClient>,
        storage: Arc<dyn StorageClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            generation,
            publisher: Publisher::new(storage),
            notifier,
            ids: Arc::new(UuidGenerator),
            mode: Mutex::new(ImageMode::default()),
            state: new_shared_state(),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn mode(&self) -> ImageMode {
        *self.mode.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Switch the visible entry point. Does not touch the asset state.
    pub fn select_mode(&self, mode: ImageMode) {
        *self.mode.lock().unwrap_or_else(|p| p.into_inner()) = mode;
    }

    /// Produce a thumbnail from `source`; the mode follows the source.
    pub async fn run(&self, source: ImageSource) -> Result<String, PipelineError> {
        self.select_mode(source.mode());
        run_cycle(
            "image",
            &self.state,
            self.notifier.as_ref(),
            &MESSAGES,
            self.produce(&source),
        )
        .await
    }

    /// AI path: generate a thumbnail for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<String, PipelineError> {
        self.run(ImageSource::AiGenerated {
            prompt: prompt.to_string(),
        })
        .await
    }

    /// Direct path: publish the user's own file under its original name.
    pub async fn upload(&self, file: LocalFile) -> Result<String, PipelineError> {
        self.run(ImageSource::DirectUpload(file)).await
    }

    /// Shared publisher step for bytes the caller already holds.
    pub async fn handle_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<String, PipelineError> {
        run_cycle(
            "image",
            &self.state,
            self.notifier.as_ref(),
            &MESSAGES,
            self.package_and_publish(bytes, file_name.to_string()),
        )
        .await
    }

    async fn produce(&self, source: &ImageSource) -> Result<PublishedAsset, PipelineError> {
        let (bytes, file_name) = match source {
            ImageSource::AiGenerated { prompt } => {
                let request = GenerationRequest::new(prompt.as_str());
                if !request.is_valid() {
                    return Err(PipelineError::EmptyPrompt);
                }
                let bytes = self.generation.generate_thumbnail(&request.prompt).await?;
                (bytes, generated_file_name(AssetKind::Thumbnail, self.ids.as_ref()))
            }
            ImageSource::DirectUpload(file) => {
                let (name, bytes) = file.read().await?;
                (bytes, name)
            }
        };

        self.package_and_publish(bytes, file_name).await
    }

    async fn package_and_publish(
        &self,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<PublishedAsset, PipelineError> {
        let asset = GeneratedAsset::package(AssetKind::Thumbnail, bytes, file_name);
        log::debug!("image: packaged {} ({} bytes)", asset.file_name(), asset.len());
        self.publisher.publish(&asset).await
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AssetState {
        lock(&self.state).clone()
    }

    /// Handle for a UI loop that polls the state.
    pub fn shared_state(&self) -> SharedAssetState {
        Arc::clone(&self.state)
    }

    pub fn pipeline_state(&self) -> PipelineState {
        lock(&self.state).pipeline
    }

    pub fn is_busy(&self) -> bool {
        self.pipeline_state().is_busy()
    }

    pub fn resolved_url(&self) -> Option<String> {
        lock(&self.state).resolved_url.clone()
    }

    pub fn storage_reference(&self) -> Option<StorageReference> {
        lock(&self.state).storage.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SequenceIds;
    use crate::generation::{GenerationCall, GenerationError, MockGenerationClient};
    use crate::notify::{Notification, RecordingNotifier, Severity};
    use crate::storage::{MockStorageClient, StorageError, StorageStep};
    use tempfile::tempdir;

    struct Harness {
        pipeline: ImagePipeline,
        generation: Arc<MockGenerationClient>,
        storage: Arc<MockStorageClient>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(generation: MockGenerationClient, storage: MockStorageClient) -> Harness {
        let generation = Arc::new(generation);
        let storage = Arc::new(storage);
        let notifier = Arc::new(RecordingNotifier::default());

        let pipeline = ImagePipeline::new(generation.clone(), storage.clone(), notifier.clone())
            .with_id_generator(Arc::new(SequenceIds::default()));

        Harness {
            pipeline,
            generation,
            storage,
            notifier,
        }
    }

    fn png_bytes() -> Vec<u8> {
        vec![0x89, b'P', b'N', b'G']
    }

    #[test]
    fn starts_in_direct_upload_mode() {
        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());
        assert_eq!(h.pipeline.mode(), ImageMode::DirectUpload);
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Idle);

        h.pipeline.select_mode(ImageMode::AiGenerated);
        assert_eq!(h.pipeline.mode(), ImageMode::AiGenerated);
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn ai_thumbnail_is_packaged_as_png() {
        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());

        let url = h.pipeline.generate("a retro microphone").await.unwrap();

        assert_eq!(url, "https://files.test/storage-1");
        assert_eq!(
            h.generation.calls(),
            vec![GenerationCall::Thumbnail {
                prompt: "a retro microphone".into()
            }]
        );
        let uploads = h.storage.uploads();
        assert_eq!(uploads[0].file_name, "thumbnail-id-0.png");
        assert_eq!(uploads[0].mime_type, "image/png");
        assert_eq!(h.pipeline.mode(), ImageMode::AiGenerated);
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Ready);
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::normal("Thumbnail generated successfully")]
        );
    }

    #[tokio::test]
    async fn direct_upload_preserves_file_name() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("cover.png");
        std::fs::write(&path, vec![5u8; 10 * 1024]).unwrap();

        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());
        let url = h.pipeline.upload(LocalFile::from_path(&path)).await.unwrap();

        assert!(!url.is_empty());
        assert!(h.generation.calls().is_empty());
        let uploads = h.storage.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].file_name, "cover.png");
        assert_eq!(uploads[0].len, 10 * 1024);
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Ready);
        assert_eq!(h.pipeline.resolved_url(), Some(url));
        assert_eq!(h.pipeline.mode(), ImageMode::DirectUpload);
    }

    #[tokio::test]
    async fn unreadable_file_fails_with_distinct_notice() {
        let dir = tempdir().expect("temp dir");
        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());

        let err = h
            .pipeline
            .upload(LocalFile::from_path(dir.path().join("missing.png")))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::FileRead(_)));
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Failed);
        assert!(h.storage.uploads().is_empty());
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::destructive("Error loading the image")]
        );
    }

    #[tokio::test]
    async fn empty_prompt_fails_without_remote_call() {
        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());

        let err = h.pipeline.generate("").await.unwrap_err();

        assert_eq!(err, PipelineError::EmptyPrompt);
        assert!(h.generation.calls().is_empty());
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Failed);
    }

    #[tokio::test]
    async fn generation_failure_clears_busy() {
        let h = harness(
            MockGenerationClient::err(GenerationError::Status {
                status: 400,
                body: "content policy".into(),
            }),
            MockStorageClient::ok(),
        );

        h.pipeline.generate("x").await.unwrap_err();

        assert!(!h.pipeline.is_busy());
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Failed);
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::destructive("Error generating thumbnail")]
        );
    }

    /// Publisher failures settle at Failed rather than leaving Busy set.
    #[tokio::test]
    async fn upload_failure_clears_busy_and_url() {
        let h = harness(
            MockGenerationClient::ok(png_bytes()),
            MockStorageClient::failing_at(
                StorageStep::Upload,
                StorageError::Request("connection reset".into()),
            ),
        );

        let err = h
            .pipeline
            .handle_image(vec![1, 2, 3], "cover.png")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PipelineError::Upload(StorageError::Request("connection reset".into()))
        );
        let state = h.pipeline.state();
        assert_eq!(state.pipeline, PipelineState::Failed);
        assert!(state.resolved_url.is_none());
        assert!(state.storage.is_none());

        let seen = h.notifier.notifications();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn handle_image_publishes_given_bytes() {
        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());

        let url = h.pipeline.handle_image(vec![0; 16], "art.png").await.unwrap();

        assert_eq!(url, "https://files.test/storage-1");
        assert_eq!(
            h.pipeline.storage_reference(),
            Some(StorageReference::new("storage-1"))
        );
        assert_eq!(h.storage.resolved(), vec!["storage-1".to_string()]);
    }

    #[tokio::test]
    async fn retry_after_failure_succeeds() {
        let h = harness(MockGenerationClient::ok(png_bytes()), MockStorageClient::ok());

        h.pipeline.generate("").await.unwrap_err();
        h.pipeline.generate("second try").await.unwrap();

        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Ready);
        assert!(h.pipeline.state().error.is_none());
    }
}
