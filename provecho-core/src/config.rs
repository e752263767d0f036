use anyhow::{Context, Result};

use crate::prompt::PromptStyle;

/// Default chat-completions endpoint (HuggingFace router, OpenAI-style payloads)
pub const DEFAULT_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Default model used when ADVICE_MODEL env var is not set
pub const DEFAULT_MODEL: &str = "HuggingFaceTB/SmolLM3-3B:hf-inference";

/// Default completion budget, enough for three short tips
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Sampling temperature for tip generation
pub const TEMPERATURE: f32 = 0.7;

/// Application configuration from environment
#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub prompt_style: PromptStyle,
    /// Attach the per-request diagnostic trace to response payloads
    pub debug_trace: bool,
}

impl Config {
    /// Load configuration from .env file and environment
    ///
    /// The bearer token is the only required value; everything else has a
    /// default. Malformed values are startup errors, not silent fallbacks.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Not an error if .env is missing

        let api_token = std::env::var("HF_TOKEN").context("HF_TOKEN not set")?;

        let api_url =
            std::env::var("CHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = std::env::var("ADVICE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = std::env::var("MAX_TOKENS")
            .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
            .parse()
            .context("Invalid MAX_TOKENS")?;

        let prompt_style = match std::env::var("PROMPT_STYLE") {
            Ok(raw) => raw.parse().context("Invalid PROMPT_STYLE")?,
            Err(_) => PromptStyle::default(),
        };

        let debug_trace = match std::env::var("ADVICE_DEBUG") {
            Ok(raw) => matches!(raw.trim(), "1" | "true" | "yes"),
            Err(_) => true,
        };

        Ok(Self {
            api_token,
            api_url,
            model,
            max_tokens,
            prompt_style,
            debug_trace,
        })
    }
}
