//! The prompt and voice handed to the Generation Invoker.

use super::voice::Voice;

/// A single generation request.
///
/// `voice` only applies to audio; the image pipeline always leaves it `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub voice: Option<Voice>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = Some(voice);
        self
    }

    /// A request may only reach the remote service with a non-empty prompt.
    ///
    /// The prompt content itself is not inspected: whitespace-only prompts
    /// are forwarded as-is.
    pub fn is_valid(&self) -> bool {
        !self.prompt.is_empty()
    }

    /// The voice to use, falling back to `default`.
    pub fn voice_or(&self, default: Voice) -> Voice {
        self.voice.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_is_invalid() {
        assert!(!GenerationRequest::new("").is_valid());
        assert!(GenerationRequest::new(" ").is_valid());
        assert!(GenerationRequest::new("A calm ocean at sunset").is_valid());
    }

    #[test]
    fn voice_falls_back_to_default() {
        let request = GenerationRequest::new("hi");
        assert_eq!(request.voice_or(Voice::Onyx), Voice::Onyx);

        let request = request.with_voice(Voice::Echo);
        assert_eq!(request.voice_or(Voice::Onyx), Voice::Echo);
    }
}
