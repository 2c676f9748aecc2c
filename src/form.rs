//! What the owning podcast form persists from the two pipelines.

use serde::Serialize;

use crate::generation::Voice;
use crate::pipeline::{AudioPipeline, ImagePipeline};
use crate::storage::StorageReference;

/// A required piece that is not available yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAsset {
    AudioUrl,
    AudioStorage,
    AudioDuration,
    ImageUrl,
    ImageStorage,
}

/// Asset fields of a podcast draft, ready to be submitted with the rest of
/// the podcast metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastAssets {
    pub voice_prompt: String,
    pub voice_type: Option<Voice>,
    pub audio_url: Option<String>,
    pub audio_storage_id: Option<StorageReference>,
    pub audio_duration: Option<f64>,
    pub image_prompt: String,
    pub image_url: Option<String>,
    pub image_storage_id: Option<StorageReference>,
}

impl PodcastAssets {
    /// Snapshot both pipelines. Prompts and voice come from the form inputs.
    pub fn collect(
        audio: &AudioPipeline,
        image: &ImagePipeline,
        voice_prompt: &str,
        voice_type: Option<Voice>,
        image_prompt: &str,
    ) -> Self {
        let audio_state = audio.state();
        let image_state = image.state();

        Self {
            voice_prompt: voice_prompt.to_string(),
            voice_type,
            audio_url: audio_state.resolved_url,
            audio_storage_id: audio_state.storage,
            audio_duration: audio_state.duration_secs,
            image_prompt: image_prompt.to_string(),
            image_url: image_state.resolved_url,
            image_storage_id: image_state.storage,
        }
    }

    pub fn missing(&self) -> Vec<MissingAsset> {
        let mut missing = Vec::new();
        if self.audio_url.is_none() {
            missing.push(MissingAsset::AudioUrl);
        }
        if self.audio_storage_id.is_none() {
            missing.push(MissingAsset::AudioStorage);
        }
        if self.audio_duration.is_none() {
            missing.push(MissingAsset::AudioDuration);
        }
        if self.image_url.is_none() {
            missing.push(MissingAsset::ImageUrl);
        }
        if self.image_storage_id.is_none() {
            missing.push(MissingAsset::ImageStorage);
        }
        missing
    }

    /// Both assets resolved and the clip length known.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}
