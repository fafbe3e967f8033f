use std::sync::{Arc, Mutex};
use std::time::Duration;

use medibot_engine::{
    CaptureError, ChatRequest, ChatSettings, EndCallback, EngineConfig, EngineEvent, EngineHandle,
    EventSink, FailureKind, HistoryEntry, RecognitionConfig, RecognitionResult, ResultCallback,
    Role, SpeechError, SpeechRecognizer, TranscriptionResult, UnsupportedRecognizer,
};
use serde_json::json;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestSink {
    tx: UnboundedSender<EngineEvent>,
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

fn test_sink() -> (Arc<TestSink>, UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = unbounded_channel();
    (Arc::new(TestSink { tx }), rx)
}

/// Speech double: records the config and hands the callbacks to the test.
#[derive(Default)]
struct FakeRecognizer {
    unavailable: bool,
    config: Mutex<Option<RecognitionConfig>>,
    callbacks: Mutex<Option<(ResultCallback, EndCallback)>>,
    stopped: Mutex<bool>,
}

impl FakeRecognizer {
    fn deliver(&self, results: Vec<RecognitionResult>) {
        let (mut on_result, on_end) = self.callbacks.lock().unwrap().take().expect("started");
        on_result(results);
        on_end();
    }

    fn end_silently(&self) {
        let (_, on_end) = self.callbacks.lock().unwrap().take().expect("started");
        on_end();
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn start(
        &self,
        config: &RecognitionConfig,
        on_result: ResultCallback,
        on_end: EndCallback,
    ) -> Result<(), SpeechError> {
        *self.config.lock().unwrap() = Some(config.clone());
        *self.callbacks.lock().unwrap() = Some((on_result, on_end));
        Ok(())
    }

    fn stop(&self) {
        *self.stopped.lock().unwrap() = true;
    }
}

fn engine_for(
    server: &MockServer,
    recognizer: Arc<dyn SpeechRecognizer>,
    sink: Arc<TestSink>,
) -> EngineHandle {
    let config = EngineConfig {
        chat: ChatSettings {
            endpoint: format!("{}/api/chat", server.uri()),
            ..ChatSettings::default()
        },
        ..EngineConfig::default()
    };
    EngineHandle::new(config, recognizer, sink)
}

fn request(text: &str) -> ChatRequest {
    ChatRequest {
        message: text.to_string(),
        history: vec![HistoryEntry {
            role: Role::User,
            content: text.to_string(),
        }],
    }
}

async fn next_event(rx: &mut UnboundedReceiver<EngineEvent>) -> Option<EngineEvent> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_completion_is_reported_with_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "reply": "お早めに医師にご相談ください" })),
        )
        .mount(&server)
        .await;
    let (sink, mut rx) = test_sink();
    let engine = engine_for(&server, Arc::new(UnsupportedRecognizer), sink);

    engine.send_chat(42, request("喉が痛い"));

    assert_eq!(
        next_event(&mut rx).await,
        Some(EngineEvent::ChatCompleted {
            request_id: 42,
            result: Ok("お早めに医師にご相談ください".to_string()),
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_request_is_reported_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (sink, mut rx) = test_sink();
    let engine = engine_for(&server, Arc::new(UnsupportedRecognizer), sink);

    engine.send_chat(1, request("熱"));

    match next_event(&mut rx).await {
        Some(EngineEvent::ChatCompleted { request_id, result }) => {
            assert_eq!(request_id, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_drops_in_flight_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({ "reply": "遅い返答" })),
        )
        .mount(&server)
        .await;
    let (sink, mut rx) = test_sink();
    let engine = engine_for(&server, Arc::new(UnsupportedRecognizer), sink);

    engine.send_chat(7, request("質問"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.shutdown();
    assert!(engine.is_shut_down());

    let late = tokio::time::timeout(Duration::from_millis(600), rx.recv()).await;
    assert!(!matches!(late, Ok(Some(_))), "unexpected event {late:?}");

    engine.send_chat(8, request("もう一度"));
    let late = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(!matches!(late, Ok(Some(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn capture_configures_japanese_single_shot_and_forwards_transcript() {
    let server = MockServer::start().await;
    let recognizer = Arc::new(FakeRecognizer::default());
    let (sink, mut rx) = test_sink();
    let engine = engine_for(&server, recognizer.clone(), sink);

    engine.start_capture().expect("capture starts");
    assert_eq!(
        recognizer.config.lock().unwrap().clone(),
        Some(RecognitionConfig {
            language: "ja-JP".to_string(),
            interim_results: false,
            max_alternatives: 1,
        })
    );

    recognizer.deliver(vec![RecognitionResult {
        alternatives: vec!["お腹が痛い".to_string(), "お仲が痛い".to_string()],
    }]);

    assert_eq!(
        next_event(&mut rx).await,
        Some(EngineEvent::Transcribed(TranscriptionResult {
            text: "お腹が痛い".to_string()
        }))
    );
    assert_eq!(next_event(&mut rx).await, Some(EngineEvent::CaptureEnded));
}

#[tokio::test(flavor = "multi_thread")]
async fn capture_end_without_result_still_reports_end() {
    let server = MockServer::start().await;
    let recognizer = Arc::new(FakeRecognizer::default());
    let (sink, mut rx) = test_sink();
    let engine = engine_for(&server, recognizer.clone(), sink);

    engine.start_capture().expect("capture starts");
    recognizer.end_silently();

    assert_eq!(next_event(&mut rx).await, Some(EngineEvent::CaptureEnded));
}

#[tokio::test(flavor = "multi_thread")]
async fn unavailable_capability_is_reported_synchronously() {
    let server = MockServer::start().await;
    let recognizer = Arc::new(FakeRecognizer {
        unavailable: true,
        ..FakeRecognizer::default()
    });
    let (sink, _rx) = test_sink();
    let engine = engine_for(&server, recognizer.clone(), sink);

    assert_eq!(engine.start_capture(), Err(CaptureError::Unavailable));
    assert!(recognizer.config.lock().unwrap().is_none());

    let (sink, _rx) = test_sink();
    let engine = engine_for(&server, Arc::new(UnsupportedRecognizer), sink);
    assert_eq!(engine.start_capture(), Err(CaptureError::Unavailable));
}

#[tokio::test(flavor = "multi_thread")]
async fn speech_callbacks_after_shutdown_are_ignored() {
    let server = MockServer::start().await;
    let recognizer = Arc::new(FakeRecognizer::default());
    let (sink, mut rx) = test_sink();
    let engine = engine_for(&server, recognizer.clone(), sink);

    engine.start_capture().expect("capture starts");
    engine.shutdown();
    assert!(*recognizer.stopped.lock().unwrap());

    recognizer.deliver(vec![RecognitionResult {
        alternatives: vec!["遅い".to_string()],
    }]);
    let late = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(!matches!(late, Ok(Some(_))));
    assert_eq!(engine.start_capture(), Err(CaptureError::ShutDown));
}
