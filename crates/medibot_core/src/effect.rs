use crate::{Message, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST `message` together with the full `history` (newest user turn included).
    SendChat {
        request_id: RequestId,
        message: String,
        history: Vec<Message>,
    },
    StartCapture,
    StopCapture,
    /// A message was appended; keep the newest entry in view.
    ScrollToLatest,
    /// Give keyboard focus back to the input box.
    FocusInput,
    /// Swallow the newline the submit key would otherwise insert.
    SuppressNewline,
    /// Blocking notification outside the conversation.
    NotifyUser { text: String },
    /// Cancel outstanding engine work; the session is gone.
    Shutdown,
}
