use crate::{shows_booking_cta, AppState, FailureKind, Message};
use crate::{PLACEHOLDER_BUSY, PLACEHOLDER_IDLE};

/// Read-only snapshot handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub messages: Vec<Message>,
    pub draft: String,
    pub busy: bool,
    pub recording: bool,
    pub show_booking_cta: bool,
    pub send_enabled: bool,
    pub voice_enabled: bool,
    pub input_read_only: bool,
    pub placeholder: &'static str,
    pub last_failure: Option<FailureKind>,
    pub closed: bool,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let messages = state.history().snapshot().to_vec();
        let busy = state.is_busy();
        let recording = state.is_recording();
        let closed = state.is_closed();

        Self {
            show_booking_cta: shows_booking_cta(&messages),
            messages,
            draft: state.draft().to_string(),
            busy,
            recording,
            send_enabled: !closed && !busy && !state.draft().trim().is_empty(),
            voice_enabled: !closed && !busy && !recording,
            input_read_only: busy,
            placeholder: if busy { PLACEHOLDER_BUSY } else { PLACEHOLDER_IDLE },
            last_failure: state.last_failure(),
            closed,
        }
    }
}
