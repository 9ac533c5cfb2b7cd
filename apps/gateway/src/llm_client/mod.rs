/// LLM Client — the single point of entry for all generative-AI calls in the gateway.
///
/// ARCHITECTURAL RULE: handlers never talk to a provider directly.
/// They go through the `GenerativeProvider` held in `AppState`.
///
/// One call per request. There is no retry loop: a failed call is a failed response.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;

const IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0} is not configured")]
    MissingCredentials(&'static str),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A single text completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// What the gateway needs from a generative backend.
/// Carried in `AppState` as `Arc<dyn GenerativeProvider>` so tests can script it.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Returns the raw text of the first completion choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// Generates one image and returns its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI-compatible)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ImageResponse {
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub struct ImageData {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP client for the text model (chat completions) and the image model.
/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    text_base_url: String,
    text_api_key: String,
    text_model: String,
    image_base_url: String,
    image_api_key: Option<String>,
    image_model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            text_base_url: config.text_api_base_url.trim_end_matches('/').to_string(),
            text_api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_base_url: config.image_api_base_url.trim_end_matches('/').to_string(),
            image_api_key: config.openai_api_key.clone(),
            image_model: config.image_model.clone(),
        })
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> Result<R, LlmError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl GenerativeProvider for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.text_model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/chat/completions", self.text_base_url);
        let response: ChatResponse = self.post_json(&url, &self.text_api_key, &body).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                self.text_model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .image_api_key
            .as_deref()
            .ok_or(LlmError::MissingCredentials("OPENAI_API_KEY"))?;

        let body = ImageRequest {
            model: &self.image_model,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
            response_format: "url",
        };

        let url = format!("{}/images/generations", self.image_base_url);
        let response: ImageResponse = self.post_json(&url, api_key, &body).await?;

        debug!("Image generated with model={}", self.image_model);

        response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
