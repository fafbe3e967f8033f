use crate::Message;

/// Health-checkup terms that surface the booking link.
pub const BOOKING_KEYWORDS: [&str; 2] = ["人間ドック", "健診"];

pub fn mentions_booking(content: &str) -> bool {
    BOOKING_KEYWORDS
        .iter()
        .any(|keyword| content.contains(keyword))
}

/// Evaluated against the newest message regardless of its role.
pub fn shows_booking_cta(messages: &[Message]) -> bool {
    messages
        .last()
        .is_some_and(|message| mentions_booking(message.content()))
}
