//! User-facing copy shown by every front-end.

pub const PAGE_TITLE: &str = "AI健康相談 (PoC)";

pub const DISCLAIMER: &str = "このAIは一般的な健康アドバイスを提供します。正確性は保証されません。症状がある場合は必ず医師の診察を受けてください。";

/// Appended as the assistant turn whenever a chat request fails.
pub const FALLBACK_ERROR_MESSAGE: &str = "エラーが発生しました。時間をおいて再度お試しください。";

pub const CAPTURE_UNAVAILABLE_MESSAGE: &str = "お使いの環境は音声認識に対応していません";

pub const BOOKING_LABEL: &str = "健診・人間ドックを予約する";

pub const PLACEHOLDER_IDLE: &str = "メッセージを入力...";
pub const PLACEHOLDER_BUSY: &str = "AIが回答中です...";
