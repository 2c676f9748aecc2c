//! Asset kinds and unique file-name derivation.

use uuid::Uuid;

/// The two asset types the pipelines produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Narrated podcast episode.
    PodcastAudio,
    /// Cover image shown next to the episode.
    Thumbnail,
}

impl AssetKind {
    /// Content type every asset of this kind is packaged with.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AssetKind::PodcastAudio => "audio/mpeg",
            AssetKind::Thumbnail => "image/png",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            AssetKind::PodcastAudio => "podcast",
            AssetKind::Thumbnail => "thumbnail",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            AssetKind::PodcastAudio => "mp3",
            AssetKind::Thumbnail => "png",
        }
    }
}

/// Source of the random identifier embedded in generated file names.
///
/// Production code uses [`UuidGenerator`]; tests inject a fixed sequence.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Version-4 random UUIDs, hyphenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `podcast-<id>.mp3` or `thumbnail-<id>.png`.
pub fn generated_file_name(kind: AssetKind, ids: &dyn IdGenerator) -> String {
    format!("{}-{}.{}", kind.prefix(), ids.next_id(), kind.extension())
}

/// Deterministic ids `id-0`, `id-1`, … for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl IdGenerator for SequenceIds {
    fn next_id(&self) -> String {
        let n = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        format!("id-{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedId(&'static str);

    impl IdGenerator for FixedId {
        fn next_id(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn mime_types_are_fixed_per_kind() {
        assert_eq!(AssetKind::PodcastAudio.mime_type(), "audio/mpeg");
        assert_eq!(AssetKind::Thumbnail.mime_type(), "image/png");
    }

    #[test]
    fn file_names_embed_injected_id() {
        let ids = FixedId("abc");
        assert_eq!(
            generated_file_name(AssetKind::PodcastAudio, &ids),
            "podcast-abc.mp3"
        );
        assert_eq!(
            generated_file_name(AssetKind::Thumbnail, &ids),
            "thumbnail-abc.png"
        );
    }

    #[test]
    fn uuid_file_names_are_unique_v4() {
        let a = generated_file_name(AssetKind::PodcastAudio, &UuidGenerator);
        let b = generated_file_name(AssetKind::PodcastAudio, &UuidGenerator);
        assert_ne!(a, b);

        let id = a
            .strip_prefix("podcast-")
            .and_then(|rest| rest.strip_suffix(".mp3"))
            .expect("podcast-<id>.mp3");
        let parsed = Uuid::parse_str(id).expect("embedded id is a uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }
}
