//! HTTP client for the multi-agent chat backend.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::core::config::ClientConfig;
use crate::core::errors::{ChatError, ChatResult};

use super::wire::{ChatRequest, ChatResponse, LogsResponse};

/// A backend able to answer one chat turn.
///
/// Implementations make exactly one attempt per call; retrying is not their job.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one turn and return the decoded reply.
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatResponse>;

    /// Fetch the backend's log lines for a conversation.
    async fn logs(&self, conversation_id: &str) -> ChatResult<Vec<String>>;
}

/// `reqwest`-based backend talking JSON over HTTP.
#[derive(Clone, Debug)]
pub struct HttpChatBackend {
    client: Client,
    chat_url: String,
    config: ClientConfig,
}

impl HttpChatBackend {
    /// Build a backend client from the given configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> ChatResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            chat_url: config.chat_url(),
            config,
        })
    }

    /// Configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Decode a body only after the status check, so a non-2xx reply is reported as such.
    async fn decode<T>(response: reqwest::Response) -> ChatResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatResponse> {
        debug!("POST {} for {}", self.chat_url, request.conversation_id);
        let body = serde_json::to_vec(request)?;
        let response = self
            .client
            .post(&self.chat_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn logs(&self, conversation_id: &str) -> ChatResult<Vec<String>> {
        let url = self.config.logs_url(conversation_id);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let logs: LogsResponse = Self::decode(response).await?;
        Ok(logs.logs)
    }
}
