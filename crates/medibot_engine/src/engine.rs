use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{ChatClient, ChatSettings, EventSink, ReqwestChatClient};
use crate::voice::{CaptureError, VoiceCaptureAdapter};
use crate::{
    ChatError, ChatRequest, EngineEvent, FailureKind, RecognitionConfig, RequestId,
    SpeechRecognizer,
};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub chat: ChatSettings,
    pub recognition: RecognitionConfig,
}

enum EngineCommand {
    SendChat {
        request_id: RequestId,
        request: ChatRequest,
    },
    Shutdown,
}

/// Owns the IO thread. Chat requests run on a tokio runtime there; speech
/// callbacks are forwarded straight to the sink. After [`EngineHandle::shutdown`]
/// no further events are emitted.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    sink: Arc<dyn EventSink>,
    voice: VoiceCaptureAdapter,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(
        config: EngineConfig,
        recognizer: Arc<dyn SpeechRecognizer>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let client = Arc::new(ReqwestChatClient::new(config.chat));
        Self::with_client(client, config.recognition, recognizer, sink)
    }

    pub fn with_client(
        client: Arc<dyn ChatClient>,
        recognition: RecognitionConfig,
        recognizer: Arc<dyn SpeechRecognizer>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let voice = VoiceCaptureAdapter::new(recognizer, recognition, cancel.clone());

        let worker_sink = sink.clone();
        let worker_cancel = cancel.clone();
        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::SendChat {
                        request_id,
                        request,
                    } => {
                        let client = client.clone();
                        let sink = worker_sink.clone();
                        let cancel = worker_cancel.clone();
                        runtime.spawn(async move {
                            run_chat(client.as_ref(), request_id, request, sink.as_ref(), &cancel)
                                .await;
                        });
                    }
                    EngineCommand::Shutdown => break,
                }
            }
            engine_debug!("Engine worker exiting");
        });

        Self {
            cmd_tx,
            sink,
            voice,
            cancel,
        }
    }

    pub fn send_chat(&self, request_id: RequestId, request: ChatRequest) {
        if self.cancel.is_cancelled() {
            engine_warn!("Chat request {} after shutdown ignored", request_id);
            return;
        }
        let command = EngineCommand::SendChat {
            request_id,
            request,
        };
        if self.cmd_tx.send(command).is_err() {
            // Worker is gone; every accepted request still gets a completion.
            engine_error!("Engine worker unavailable, failing chat request {}", request_id);
            self.sink.emit(EngineEvent::ChatCompleted {
                request_id,
                result: Err(ChatError::new(FailureKind::Network, "engine unavailable")),
            });
        }
    }

    pub fn start_capture(&self) -> Result<(), CaptureError> {
        self.voice.start_capture(self.sink.clone())
    }

    pub fn stop_capture(&self) {
        self.voice.stop_capture();
    }

    /// Cancels outstanding requests and silences late speech callbacks.
    pub fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        engine_info!("Engine shutting down");
        self.cancel.cancel();
        self.voice.stop_capture();
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_chat(
    client: &dyn ChatClient,
    request_id: RequestId,
    request: ChatRequest,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => {
            engine_info!("Chat request {} dropped on shutdown", request_id);
        }
        result = client.send(&request) => {
            if cancel.is_cancelled() {
                return;
            }
            if let Err(err) = &result {
                engine_warn!("Chat request {} failed: {}", request_id, err);
            }
            sink.emit(EngineEvent::ChatCompleted { request_id, result });
        }
    }
}
