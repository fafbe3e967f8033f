//! Medibot core: pure conversation state machine and view-model helpers.
mod cta;
mod effect;
mod key;
mod msg;
mod state;
mod strings;
mod update;
mod view_model;

pub use cta::{mentions_booking, shows_booking_cta, BOOKING_KEYWORDS};
pub use effect::Effect;
pub use key::{Key, KeyInput};
pub use msg::{ChatOutcome, FailureKind, Msg};
pub use state::{
    append_transcript, AppState, ConversationHistory, Message, Rejection, RequestId, Role,
};
pub use strings::{
    BOOKING_LABEL, CAPTURE_UNAVAILABLE_MESSAGE, DISCLAIMER, FALLBACK_ERROR_MESSAGE,
    PAGE_TITLE, PLACEHOLDER_BUSY, PLACEHOLDER_IDLE,
};
pub use update::update;
pub use view_model::AppViewModel;
