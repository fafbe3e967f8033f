use std::time::Duration;

use engine_logging::engine_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{ChatError, ChatRequest, ChatResponse, EngineEvent, FailureKind, DEFAULT_ENDPOINT};

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub endpoint: String,
    /// `None` keeps the transport default (no overall deadline).
    pub request_timeout: Option<Duration>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// One attempt, no retries. Returns the assistant reply text.
    async fn send(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestChatClient {
    settings: ChatSettings,
}

impl ReqwestChatClient {
    pub fn new(settings: ChatSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| ChatError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ChatClient for ReqwestChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| ChatError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ChatError::new(FailureKind::Network, err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!("Chat response status={} bytes={}", status, bytes.len());

        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ChatError::new(FailureKind::MalformedResponse, err.to_string()))?;
        parsed.into_reply()
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        return ChatError::new(FailureKind::Timeout, err.to_string());
    }
    ChatError::new(FailureKind::Network, err.to_string())
}
