//! Audio pipeline — prompt + voice → speech → `podcast-<id>.mp3` → URL.

use std::sync::Arc;

use super::cycle::{run_cycle, Messages};
use super::error::PipelineError;
use super::publisher::{PublishedAsset, Publisher};
use super::state::{lock, new_shared_state, AssetState, PipelineState, SharedAssetState};
use crate::asset::{AssetKind, GeneratedAsset, IdGenerator, UuidGenerator};
use crate::generation::{GenerationClient, GenerationRequest, Voice};
use crate::notify::Notifier;
use crate::storage::{StorageClient, StorageReference};

const MESSAGES: Messages = Messages {
    success: "Podcast generated successfully",
    failure: "Error generating podcast",
    missing_prompt: "Please provide a prompt to generate the podcast",
    unreadable_file: "Error generating podcast",
};

/// Generates narrated podcast audio and publishes it.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use podcast_assets::config::AppConfig;
/// use podcast_assets::generation::{ApiGenerationClient, Voice};
/// use podcast_assets::notify::LogNotifier;
/// use podcast_assets::pipeline::AudioPipeline;
/// use podcast_assets::storage::HttpStorageClient;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let audio = AudioPipeline::new(
///     Arc::new(ApiGenerationClient::from_config(&config.generation)),
///     Arc::new(HttpStorageClient::from_config(&config.storage)),
///     Arc::new(LogNotifier),
/// );
///
/// let url = audio.generate("A calm ocean at sunset", Some(Voice::Alloy)).await;
/// # }
/// ```
pub struct AudioPipeline {
    generation: Arc<dyn GenerationClient>,
    publisher: Publisher,
    notifier: Arc<dyn Notifier>,
    ids: Arc<dyn IdGenerator>,
    default_voice: Voice,
    state: SharedAssetState,
}

impl AudioPipeline {
    /// Create a pipeline in `Idle` with random file ids and the `alloy` voice.
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
            default_voice: Voice::default(),
            state: new_shared_state(),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Voice used when [`generate`](Self::generate) is called without one.
    pub fn with_default_voice(mut self, voice: Voice) -> Self {
        self.default_voice = voice;
        self
    }

    /// Generate speech for `prompt`, upload it and resolve its URL.
    ///
    /// An empty prompt fails with [`PipelineError::EmptyPrompt`] before any
    /// remote call. On every outcome the state settles at `Ready` or
    /// `Failed` and exactly one notification is emitted.
    pub async fn generate(
        &self,
        prompt: &str,
        voice: Option<Voice>,
    ) -> Result<String, PipelineError> {
        let mut request = GenerationRequest::new(prompt);
        request.voice = voice;
        self.run(request).await
    }

    /// [`generate`](Self::generate) taking a prepared request.
    pub async fn run(&self, request: GenerationRequest) -> Result<String, PipelineError> {
        run_cycle(
            "audio",
            &self.state,
            self.notifier.as_ref(),
            &MESSAGES,
            self.produce(&request),
        )
        .await
    }

    async fn produce(&self, request: &GenerationRequest) -> Result<PublishedAsset, PipelineError> {
        if !request.is_valid() {
            return Err(PipelineError::EmptyPrompt);
        }

        let voice = request.voice_or(self.default_voice);
        let bytes = self
            .generation
            .generate_audio(voice.as_str(), &request.prompt)
            .await?;

        let asset = GeneratedAsset::generated(AssetKind::PodcastAudio, bytes, self.ids.as_ref());
        log::debug!("audio: packaged {} ({} bytes)", asset.file_name(), asset.len());

        self.publisher.publish(&asset).await
    }

    /// Record the clip length once the playback element has loaded metadata.
    ///
    /// Ignored unless a URL is resolved and `secs` is finite and non-negative.
    pub fn report_duration(&self, secs: f64) {
        let mut st = lock(&self.state);
        if st.resolved_url.is_none() || !secs.is_finite() || secs < 0.0 {
            log::debug!("audio: ignoring duration {secs}");
            return;
        }
        st.duration_secs = Some(secs);
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

    pub fn duration_secs(&self) -> Option<f64> {
        lock(&self.state).duration_secs
    }

    pub fn default_voice(&self) -> Voice {
        self.default_voice
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

    struct Harness {
        pipeline: AudioPipeline,
        generation: Arc<MockGenerationClient>,
        storage: Arc<MockStorageClient>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(generation: MockGenerationClient, storage: MockStorageClient) -> Harness {
        let generation = Arc::new(generation);
        let storage = Arc::new(storage);
        let notifier = Arc::new(RecordingNotifier::default());

        let pipeline = AudioPipeline::new(generation.clone(), storage.clone(), notifier.clone())
            .with_id_generator(Arc::new(SequenceIds::default()));

        Harness {
            pipeline,
            generation,
            storage,
            notifier,
        }
    }

    fn mp3_bytes() -> Vec<u8> {
        vec![0x49, 0x44, 0x33, 0x04]
    }

    #[tokio::test]
    async fn calm_ocean_with_alloy_reaches_ready() {
        let h = harness(MockGenerationClient::ok(mp3_bytes()), MockStorageClient::ok());

        let url = h
            .pipeline
            .generate("A calm ocean at sunset", Some(Voice::Alloy))
            .await
            .unwrap();

        assert_eq!(
            h.generation.calls(),
            vec![GenerationCall::Audio {
                voice: "alloy".into(),
                input: "A calm ocean at sunset".into(),
            }]
        );
        assert!(!url.is_empty());
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Ready);
        assert_eq!(h.pipeline.resolved_url(), Some(url));
        assert_eq!(
            h.pipeline.storage_reference(),
            Some(StorageReference::new("storage-1"))
        );
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::normal("Podcast generated successfully")]
        );
    }

    #[tokio::test]
    async fn packages_as_mp3_with_unique_name() {
        let h = harness(MockGenerationClient::ok(mp3_bytes()), MockStorageClient::ok());

        h.pipeline.generate("first", None).await.unwrap();
        h.pipeline.generate("second", None).await.unwrap();

        let uploads = h.storage.uploads();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].file_name, "podcast-id-0.mp3");
        assert_eq!(uploads[1].file_name, "podcast-id-1.mp3");
        assert!(uploads.iter().all(|u| u.mime_type == "audio/mpeg"));
        assert_eq!(uploads[0].len, mp3_bytes().len());
    }

    #[tokio::test]
    async fn missing_voice_uses_default() {
        let h = harness(MockGenerationClient::ok(mp3_bytes()), MockStorageClient::ok());
        let pipeline = h.pipeline.with_default_voice(Voice::Nova);

        pipeline.generate("hello", None).await.unwrap();

        assert_eq!(
            h.generation.calls(),
            vec![GenerationCall::Audio {
                voice: "nova".into(),
                input: "hello".into(),
            }]
        );
    }

    #[tokio::test]
    async fn empty_prompt_fails_without_remote_call() {
        let h = harness(MockGenerationClient::ok(mp3_bytes()), MockStorageClient::ok());

        let err = h.pipeline.generate("", Some(Voice::Alloy)).await.unwrap_err();

        assert_eq!(err, PipelineError::EmptyPrompt);
        assert!(h.generation.calls().is_empty());
        assert!(h.storage.uploads().is_empty());

        let state = h.pipeline.state();
        assert_eq!(state.pipeline, PipelineState::Failed);
        assert!(state.resolved_url.is_none());
        assert_eq!(state.error, Some(PipelineError::EmptyPrompt));
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::destructive(
                "Please provide a prompt to generate the podcast"
            )]
        );
    }

    #[tokio::test]
    async fn generation_failure_settles_failed() {
        let h = harness(
            MockGenerationClient::err(GenerationError::Timeout),
            MockStorageClient::ok(),
        );

        let err = h.pipeline.generate("hi", None).await.unwrap_err();

        assert_eq!(err, PipelineError::Generation(GenerationError::Timeout));
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Failed);
        assert!(h.pipeline.resolved_url().is_none());
        assert!(h.storage.uploads().is_empty());
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::destructive("Error generating podcast")]
        );
    }

    #[tokio::test]
    async fn upload_failure_notifies_destructive() {
        let h = harness(
            MockGenerationClient::ok(mp3_bytes()),
            MockStorageClient::failing_at(StorageStep::Upload, StorageError::Timeout),
        );

        let err = h.pipeline.generate("hi", None).await.unwrap_err();

        assert_eq!(err, PipelineError::Upload(StorageError::Timeout));
        assert!(h.pipeline.resolved_url().is_none());
        assert!(h.pipeline.storage_reference().is_none());
        assert!(!h.pipeline.is_busy());

        let seen = h.notifier.notifications();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn resolution_failure_keeps_url_empty() {
        let h = harness(
            MockGenerationClient::ok(mp3_bytes()),
            MockStorageClient::failing_at(
                StorageStep::Resolve,
                StorageError::UrlNotFound("storage-1".into()),
            ),
        );

        let err = h.pipeline.generate("hi", None).await.unwrap_err();

        assert_eq!(
            err,
            PipelineError::Resolution(StorageError::UrlNotFound("storage-1".into()))
        );
        let state = h.pipeline.state();
        assert_eq!(state.pipeline, PipelineState::Failed);
        assert!(state.resolved_url.is_none());
        assert!(state.storage.is_none());
    }

    /// A failed cycle can be retried; a new cycle wipes the previous result.
    #[tokio::test]
    async fn retry_after_failure_and_new_cycle_clears_previous() {
        let h = harness(MockGenerationClient::ok(mp3_bytes()), MockStorageClient::ok());

        h.pipeline.generate("", None).await.unwrap_err();
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Failed);

        h.pipeline.generate("take two", None).await.unwrap();
        assert_eq!(h.pipeline.pipeline_state(), PipelineState::Ready);
        assert!(h.pipeline.state().error.is_none());
        h.pipeline.report_duration(42.0);

        h.pipeline.generate("", None).await.unwrap_err();
        let state = h.pipeline.state();
        assert!(state.resolved_url.is_none());
        assert!(state.storage.is_none());
        assert!(state.duration_secs.is_none());
    }

    #[tokio::test]
    async fn duration_is_recorded_only_for_resolved_audio() {
        let h = harness(MockGenerationClient::ok(mp3_bytes()), MockStorageClient::ok());

        h.pipeline.report_duration(10.0);
        assert_eq!(h.pipeline.duration_secs(), None);

        h.pipeline.generate("hi", None).await.unwrap();
        h.pipeline.report_duration(f64::NAN);
        assert_eq!(h.pipeline.duration_secs(), None);
        h.pipeline.report_duration(-1.0);
        assert_eq!(h.pipeline.duration_secs(), None);

        h.pipeline.report_duration(93.5);
        assert_eq!(h.pipeline.duration_secs(), Some(93.5));
    }
}
