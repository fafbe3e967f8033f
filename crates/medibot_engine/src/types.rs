use std::fmt;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

pub const DEFAULT_ENDPOINT: &str =
    "https://medical-bot-api-ghgpf6ghccdbhjcp.centralus-01.azurewebsites.net/api/chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Body of `POST <endpoint>`. `history` already contains `message` as its last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

/// Success body. Unknown fields are ignored; `reply` is checked explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
}

impl ChatResponse {
    pub fn into_reply(self) -> Result<String, ChatError> {
        match self.reply {
            Some(reply) if !reply.trim().is_empty() => Ok(reply),
            Some(_) => Err(ChatError::new(
                FailureKind::MalformedResponse,
                "reply field is blank",
            )),
            None => Err(ChatError::new(
                FailureKind::MalformedResponse,
                "reply field missing",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChatCompleted {
        request_id: RequestId,
        result: Result<String, ChatError>,
    },
    Transcribed(TranscriptionResult),
    CaptureEnded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ChatError {
    pub kind: FailureKind,
    pub message: String,
}

impl ChatError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
}

impl FailureKind {
    /// Everything except an unusable 2xx body is a transport problem.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FailureKind::MalformedResponse)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
