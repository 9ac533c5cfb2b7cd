use anyhow::{bail, Context, Result};
use serde::Serialize;

/// Deployment flavour of the gateway. Selects quiz option style, matching
/// prompt and whether quiz options are shuffled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptVariant {
    /// Options are concrete behavioural answers; matching short-circuits
    /// unrelated job domains to a score of 0.
    #[default]
    Behavioral,
    /// Options are a four-step agreement scale; plain matching prompt.
    Likert,
}

impl PromptVariant {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "behavioral" | "behavioural" => Ok(Self::Behavioral),
            "likert" => Ok(Self::Likert),
            other => bail!("PROMPT_VARIANT must be 'behavioral' or 'likert', got '{other}'"),
        }
    }

    /// Behavioural options are emitted from worst to best, so they get shuffled.
    pub fn shuffles_by_default(self) -> bool {
        matches!(self, Self::Behavioral)
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub openai_api_key: Option<String>,
    pub replicate_api_token: Option<String>,
    pub text_api_base_url: String,
    pub image_api_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub variant: PromptVariant,
    pub shuffle_options: bool,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let variant = match optional_env("PROMPT_VARIANT") {
            Some(v) => PromptVariant::parse(&v)?,
            None => PromptVariant::default(),
        };

        let shuffle_options = match optional_env("SHUFFLE_OPTIONS") {
            Some(v) => v
                .parse::<bool>()
                .context("SHUFFLE_OPTIONS must be 'true' or 'false'")?,
            None => variant.shuffles_by_default(),
        };

        Ok(Config {
            api_key: require_env("API_KEY")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            replicate_api_token: optional_env("REPLICATE_API_TOKEN"),
            text_api_base_url: optional_env("TEXT_API_BASE_URL")
                .unwrap_or_else(|| "https://models.inference.ai.azure.com".to_string()),
            image_api_base_url: optional_env("IMAGE_API_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            text_model: optional_env("TEXT_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            image_model: optional_env("IMAGE_MODEL").unwrap_or_else(|| "dall-e-3".to_string()),
            variant,
            shuffle_options,
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an env var, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
