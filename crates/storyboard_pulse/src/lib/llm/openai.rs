use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;

use crate::{error::Error, Completer};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Completion response has no content")]
    EmptyCompletion,
}

impl From<OpenAIError> for Error {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::MissingApiKey => Error::Configuration(err.to_string()),
            OpenAIError::Api { status, message } => Error::Service { status, message },
            OpenAIError::EmptyCompletion => Error::Service {
                status: 200,
                message: err.to_string(),
            },
            OpenAIError::Request(ref e) if e.is_decode() => Error::Service {
                status: e.status().map_or(200, |s| s.as_u16()),
                message: err.to_string(),
            },
            OpenAIError::Request(_) | OpenAIError::Middleware(_) => {
                Error::Transport(err.to_string())
            }
        }
    }
}

/// Connection and sampling settings for [`OpenAIClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound for a single attempt
    pub timeout: Duration,
    /// Retries on transient failures (timeouts, 5xx, 429) with exponential backoff
    pub max_retries: u32,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";
    pub const DEFAULT_TEMPERATURE: f32 = 0.4;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 180;
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: Self::DEFAULT_MODEL.into(),
            temperature: Self::DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAIClient {
    pub fn new(config: ClientConfig) -> Result<Self, OpenAIError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip_all, fields(model = %self.model, prompt_len = user_content.len()))]
    pub async fn send_completion_request(
        &self,
        user_content: &str,
    ) -> Result<CompletionResponse, OpenAIError> {
        // checked before any connection is opened
        let api_key = self.api_key.as_deref().ok_or(OpenAIError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": user_content
                }
            ],
            "temperature": self.temperature
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::error!(status, %message, "Completion service returned an error");
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub index: u32,
    pub message: CompletionMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl Completer for OpenAIClient {
    type Error = OpenAIError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to complete prompt"))?;

        if let Some(choice) = response.choices.first() {
            tracing::debug!(
                id = %response.id,
                finish_reason = ?choice.finish_reason,
                "Received completion"
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OpenAIError::EmptyCompletion)
    }
}
