//! Medibot engine: chat transport, speech capability and effect execution.
mod client;
mod engine;
mod speech;
mod types;
mod voice;

pub use client::{ChatClient, ChatSettings, EventSink, ReqwestChatClient};
pub use engine::{EngineConfig, EngineHandle};
pub use speech::{
    EndCallback, RecognitionConfig, RecognitionResult, ResultCallback, SpeechError,
    SpeechRecognizer, UnsupportedRecognizer, DEFAULT_LANGUAGE,
};
pub use types::{
    ChatError, ChatRequest, ChatResponse, EngineEvent, FailureKind, HistoryEntry, RequestId,
    Role, TranscriptionResult, DEFAULT_ENDPOINT,
};
pub use voice::{first_transcript, CaptureError, VoiceCaptureAdapter};
