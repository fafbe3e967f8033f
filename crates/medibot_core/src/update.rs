use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{AppState, ChatOutcome, Effect, Msg, CAPTURE_UNAVAILABLE_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // Late engine callbacks after teardown land here and are dropped.
    if state.is_closed() && !matches!(msg, Msg::Tick | Msg::NoOp) {
        engine_debug!("Dropping {} after session close", msg_name(&msg));
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::DraftChanged(text) => {
            state.set_draft(text);
            Vec::new()
        }
        Msg::Submit(text) => submit(&mut state, &text),
        Msg::KeyPressed(input) => {
            if input.is_submit() {
                let draft = state.draft().to_string();
                let mut effects = vec![Effect::SuppressNewline];
                effects.extend(submit(&mut state, &draft));
                effects
            } else {
                Vec::new()
            }
        }
        Msg::VoiceClicked => {
            // The microphone control is disabled in these states.
            if state.is_busy() || state.is_recording() {
                engine_debug!(
                    "Voice capture ignored (busy={}, recording={})",
                    state.is_busy(),
                    state.is_recording()
                );
                Vec::new()
            } else {
                vec![Effect::StartCapture]
            }
        }
        Msg::StopVoiceClicked => {
            if state.is_recording() {
                vec![Effect::StopCapture]
            } else {
                Vec::new()
            }
        }
        Msg::CaptureStarted => {
            state.set_recording(true);
            Vec::new()
        }
        Msg::CaptureUnavailable => {
            engine_warn!("Speech recognition is not available");
            vec![Effect::NotifyUser {
                text: CAPTURE_UNAVAILABLE_MESSAGE.to_string(),
            }]
        }
        Msg::Transcribed(text) => {
            engine_debug!("Transcript received chars={}", text.chars().count());
            state.apply_transcript(&text);
            Vec::new()
        }
        Msg::CaptureEnded => {
            state.set_recording(false);
            Vec::new()
        }
        Msg::ChatCompleted {
            request_id,
            outcome,
        } => {
            let failure = match &outcome {
                ChatOutcome::Failed(kind) => Some(*kind),
                ChatOutcome::Reply(_) => None,
            };
            if state.complete_submission(request_id, outcome) {
                if let Some(kind) = failure {
                    engine_warn!("Chat request {} failed: {}", request_id, kind);
                }
                vec![Effect::ScrollToLatest, Effect::FocusInput]
            } else {
                engine_debug!("Ignoring stale completion for request {}", request_id);
                Vec::new()
            }
        }
        Msg::SessionClosed => {
            engine_info!(
                "Session closed with {} messages",
                state.history().len()
            );
            state.close();
            vec![Effect::Shutdown]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState, text: &str) -> Vec<Effect> {
    match state.begin_submission(text) {
        Ok((request_id, history)) => {
            engine_info!(
                "Submitting request {} chars={} history_len={}",
                request_id,
                text.chars().count(),
                history.len()
            );
            vec![
                Effect::ScrollToLatest,
                Effect::SendChat {
                    request_id,
                    message: text.to_string(),
                    history,
                },
            ]
        }
        Err(rejection) => {
            engine_debug!("Submission rejected: {:?}", rejection);
            Vec::new()
        }
    }
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::DraftChanged(_) => "DraftChanged",
        Msg::Submit(_) => "Submit",
        Msg::KeyPressed(_) => "KeyPressed",
        Msg::VoiceClicked => "VoiceClicked",
        Msg::StopVoiceClicked => "StopVoiceClicked",
        Msg::CaptureStarted => "CaptureStarted",
        Msg::CaptureUnavailable => "CaptureUnavailable",
        Msg::Transcribed(_) => "Transcribed",
        Msg::CaptureEnded => "CaptureEnded",
        Msg::ChatCompleted { .. } => "ChatCompleted",
        Msg::SessionClosed => "SessionClosed",
        Msg::Tick => "Tick",
        Msg::NoOp => "NoOp",
    }
}
