use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the input box.
    DraftChanged(String),
    /// User submitted the given text (send button).
    Submit(String),
    /// Key pressed inside the input box.
    KeyPressed(crate::KeyInput),
    /// User clicked the microphone button.
    VoiceClicked,
    /// User asked to end the running capture.
    StopVoiceClicked,
    /// The speech capability accepted the start request.
    CaptureStarted,
    /// No speech capability on this platform.
    CaptureUnavailable,
    /// First alternative of the first recognition result.
    Transcribed(String),
    /// Capture finished, whether it produced a result or not.
    CaptureEnded,
    /// Engine completion for a chat request.
    ChatCompleted {
        request_id: crate::RequestId,
        outcome: ChatOutcome,
    },
    /// The presentation layer is being torn down.
    SessionClosed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Failed(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error or non-2xx status.
    Transport,
    /// 2xx response without a usable `reply`.
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport failure"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
