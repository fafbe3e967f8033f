use crate::view_model::AppViewModel;
use crate::{ChatOutcome, FailureKind, FALLBACK_ERROR_MESSAGE};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Append-only, insertion-ordered message log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Why a submission was not accepted. Rejections are silent to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyInput,
    AlreadyBusy,
    SessionClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    history: ConversationHistory,
    draft: String,
    in_flight: Option<RequestId>,
    next_request_id: RequestId,
    recording: bool,
    last_failure: Option<FailureKind>,
    closed: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// True strictly between an accepted submission and its completion.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_draft(&mut self, text: String) {
        if self.draft != text {
            self.draft = text;
            self.mark_dirty();
        }
    }

    /// Accepts `text` as the next user turn unless it is blank or a request
    /// is already outstanding. On success the draft is cleared and the full
    /// history, including the new turn, is returned for the outbound request.
    pub(crate) fn begin_submission(
        &mut self,
        text: &str,
    ) -> Result<(RequestId, Vec<Message>), Rejection> {
        if self.closed {
            return Err(Rejection::SessionClosed);
        }
        if text.trim().is_empty() {
            return Err(Rejection::EmptyInput);
        }
        if self.in_flight.is_some() {
            return Err(Rejection::AlreadyBusy);
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.history.append(Message::user(text));
        self.draft.clear();
        self.in_flight = Some(request_id);
        self.mark_dirty();
        Ok((request_id, self.history.snapshot().to_vec()))
    }

    /// Appends the assistant turn for `request_id` and leaves the busy state.
    /// Completions for anything but the outstanding request are dropped.
    pub(crate) fn complete_submission(
        &mut self,
        request_id: RequestId,
        outcome: ChatOutcome,
    ) -> bool {
        if self.closed || self.in_flight != Some(request_id) {
            return false;
        }

        let content = match outcome {
            ChatOutcome::Reply(reply) => {
                self.last_failure = None;
                reply
            }
            ChatOutcome::Failed(kind) => {
                self.last_failure = Some(kind);
                FALLBACK_ERROR_MESSAGE.to_string()
            }
        };
        self.history.append(Message::assistant(content));
        self.in_flight = None;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_recording(&mut self, recording: bool) {
        if self.recording != recording {
            self.recording = recording;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_transcript(&mut self, text: &str) {
        let next = append_transcript(&self.draft, text);
        self.set_draft(next);
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
        self.recording = false;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// Joins a transcript onto the draft with a single space; never overwrites.
pub fn append_transcript(draft: &str, transcript: &str) -> String {
    if draft.is_empty() {
        transcript.to_string()
    } else {
        format!("{draft} {transcript}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_fills_empty_draft() {
        assert_eq!(append_transcript("", "お腹が痛い"), "お腹が痛い");
    }

    #[test]
    fn transcript_appends_with_single_space() {
        assert_eq!(
            append_transcript("こんにちは", "お腹が痛い"),
            "こんにちは お腹が痛い"
        );
    }

    #[test]
    fn completion_for_unknown_request_is_ignored() {
        let mut state = AppState::new();
        let (request_id, _) = state.begin_submission("hello").unwrap();

        assert!(!state.complete_submission(request_id + 1, ChatOutcome::Reply("x".into())));
        assert!(state.is_busy());
        assert_eq!(state.history().len(), 1);

        assert!(state.complete_submission(request_id, ChatOutcome::Reply("hi".into())));
        assert!(!state.is_busy());
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn request_ids_are_monotonic() {
        let mut state = AppState::new();
        let (first, _) = state.begin_submission("a").unwrap();
        state.complete_submission(first, ChatOutcome::Failed(FailureKind::Transport));
        let (second, _) = state.begin_submission("b").unwrap();
        assert!(second > first);
    }

    #[test]
    fn role_labels_match_wire_format() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
