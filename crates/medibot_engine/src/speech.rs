//! Platform speech-to-text capability, injected into the voice adapter.

/// Language used when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "ja-JP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub language: String,
    /// Final results only.
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl RecognitionConfig {
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self::for_language(DEFAULT_LANGUAGE)
    }
}

/// One recognition result with its alternatives, best first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecognitionResult {
    pub alternatives: Vec<String>,
}

pub type ResultCallback = Box<dyn FnMut(Vec<RecognitionResult>) + Send>;
pub type EndCallback = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech recognition is not supported on this platform")]
    Unsupported,
    #[error("speech recognition failed to start: {0}")]
    StartFailed(String),
}

/// `on_end` must fire exactly once per successful `start`, whether or not a
/// result was produced.
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;

    fn start(
        &self,
        config: &RecognitionConfig,
        on_result: ResultCallback,
        on_end: EndCallback,
    ) -> Result<(), SpeechError>;

    fn stop(&self);
}

/// Stand-in for platforms without a speech engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(
        &self,
        _config: &RecognitionConfig,
        _on_result: ResultCallback,
        _on_end: EndCallback,
    ) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&self) {}
}
