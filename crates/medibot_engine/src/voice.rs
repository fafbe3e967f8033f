use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use tokio_util::sync::CancellationToken;

use crate::{
    EngineEvent, EventSink, RecognitionConfig, RecognitionResult, SpeechError, SpeechRecognizer,
    TranscriptionResult,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("speech recognition is not available")]
    Unavailable,
    #[error("capture already shut down")]
    ShutDown,
    #[error(transparent)]
    Speech(#[from] SpeechError),
}

/// Bridges the speech capability callbacks onto engine events.
///
/// Re-entrancy is not enforced here; callers keep the microphone control
/// disabled while a capture runs. Callbacks arriving after `cancel` fires are
/// dropped.
pub struct VoiceCaptureAdapter {
    recognizer: Arc<dyn SpeechRecognizer>,
    config: RecognitionConfig,
    cancel: CancellationToken,
}

impl VoiceCaptureAdapter {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        config: RecognitionConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            recognizer,
            config,
            cancel,
        }
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn start_capture(&self, sink: Arc<dyn EventSink>) -> Result<(), CaptureError> {
        if self.cancel.is_cancelled() {
            return Err(CaptureError::ShutDown);
        }
        if !self.recognizer.is_available() {
            return Err(CaptureError::Unavailable);
        }

        let result_cancel = self.cancel.clone();
        let result_sink = sink.clone();
        let on_result = Box::new(move |results: Vec<RecognitionResult>| {
            if result_cancel.is_cancelled() {
                return;
            }
            match first_transcript(&results) {
                Some(transcript) => result_sink.emit(EngineEvent::Transcribed(transcript)),
                None => engine_debug!("Recognition result without alternatives ignored"),
            }
        });

        let end_cancel = self.cancel.clone();
        let on_end = Box::new(move || {
            if end_cancel.is_cancelled() {
                return;
            }
            sink.emit(EngineEvent::CaptureEnded);
        });

        self.recognizer.start(&self.config, on_result, on_end)?;
        engine_info!("Voice capture started lang={}", self.config.language);
        Ok(())
    }

    pub fn stop_capture(&self) {
        self.recognizer.stop();
    }
}

/// First alternative of the first result, if any.
pub fn first_transcript(results: &[RecognitionResult]) -> Option<TranscriptionResult> {
    results
        .first()
        .and_then(|result| result.alternatives.first())
        .map(|text| TranscriptionResult { text: text.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_transcript_uses_first_alternative_of_first_result() {
        let results = vec![
            RecognitionResult {
                alternatives: vec!["お腹が痛い".to_string(), "おなかがいたい".to_string()],
            },
            RecognitionResult {
                alternatives: vec!["無視".to_string()],
            },
        ];
        assert_eq!(
            first_transcript(&results),
            Some(TranscriptionResult {
                text: "お腹が痛い".to_string()
            })
        );
    }

    #[test]
    fn first_transcript_handles_empty_results() {
        assert_eq!(first_transcript(&[]), None);
        assert_eq!(first_transcript(&[RecognitionResult::default()]), None);
    }
}
