use std::sync::mpsc;

use engine_logging::{engine_info, engine_warn};
use medibot_core::{ChatOutcome, Effect, FailureKind, Message, Msg, Role};
use medibot_engine::{
    CaptureError, ChatRequest, EngineEvent, EngineHandle, EventSink, HistoryEntry,
};

use super::app::AppEvent;

/// Forwards engine events into the app's message loop.
pub struct AppEventSink {
    tx: mpsc::Sender<AppEvent>,
}

impl AppEventSink {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Msg(map_event(event)));
    }
}

/// Result of running one batch of effects.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Messages produced synchronously, dispatched before the next input.
    pub follow_ups: Vec<Msg>,
    /// Effects only the renderer can carry out.
    pub presentation: Vec<Effect>,
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) -> RunOutput {
        let mut output = RunOutput::default();
        for effect in effects {
            match effect {
                Effect::SendChat {
                    request_id,
                    message,
                    history,
                } => {
                    engine_info!(
                        "SendChat request_id={} history_len={}",
                        request_id,
                        history.len()
                    );
                    self.engine.send_chat(
                        request_id,
                        ChatRequest {
                            message,
                            history: map_history(&history),
                        },
                    );
                }
                Effect::StartCapture => match self.engine.start_capture() {
                    Ok(()) => output.follow_ups.push(Msg::CaptureStarted),
                    Err(CaptureError::Unavailable) => {
                        output.follow_ups.push(Msg::CaptureUnavailable)
                    }
                    Err(err) => engine_warn!("Voice capture could not start: {}", err),
                },
                Effect::StopCapture => self.engine.stop_capture(),
                Effect::Shutdown => self.engine.shutdown(),
                Effect::ScrollToLatest
                | Effect::FocusInput
                | Effect::SuppressNewline
                | Effect::NotifyUser { .. } => output.presentation.push(effect),
            }
        }
        output
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChatCompleted { request_id, result } => Msg::ChatCompleted {
            request_id,
            outcome: match result {
                Ok(reply) => ChatOutcome::Reply(reply),
                Err(err) if err.kind.is_transport() => ChatOutcome::Failed(FailureKind::Transport),
                Err(_) => ChatOutcome::Failed(FailureKind::MalformedResponse),
            },
        },
        EngineEvent::Transcribed(result) => Msg::Transcribed(result.text),
        EngineEvent::CaptureEnded => Msg::CaptureEnded,
    }
}

fn map_history(history: &[Message]) -> Vec<HistoryEntry> {
    history
        .iter()
        .map(|message| HistoryEntry {
            role: map_role(message.role()),
            content: message.content().to_string(),
        })
        .collect()
}

fn map_role(role: Role) -> medibot_engine::Role {
    match role {
        Role::User => medibot_engine::Role::User,
        Role::Assistant => medibot_engine::Role::Assistant,
    }
}
