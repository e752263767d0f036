use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted by the advice endpoint
#[derive(Debug, Default, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub food: Option<String>,
}

/// Request payload for the chat completions API
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A message in the chat conversation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Successful advice payload
#[derive(Debug, Clone, Serialize)]
pub struct SuccessReply {
    pub generated_text: String,
    pub model_used: String,
    /// Upstream round-trip time, formatted as "<ms>ms"
    pub processing_time: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
}

/// Soft reply while the hosted model is still spinning up
#[derive(Debug, Clone, Serialize)]
pub struct LoadingReply {
    pub generated_text: String,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
}

/// Error payload (soft 200 for upstream failures, 400 for bad input,
/// 500 for transport failures)
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorReply {
    pub error_detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
}

impl ErrorReply {
    /// Create an error payload with only the detail set
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            error_detail: detail.into(),
            ..Default::default()
        }
    }
}

/// One of the three advice outcomes carried over HTTP 200.
///
/// Clients distinguish failure via payload shape rather than transport
/// status, so all variants serialize flat (untagged).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AdviceReply {
    Success(SuccessReply),
    Loading(LoadingReply),
    Error(ErrorReply),
}

impl AdviceReply {
    /// Attach the diagnostic trace to whichever variant this is
    #[must_use]
    pub fn with_debug(mut self, lines: Vec<String>) -> Self {
        match &mut self {
            AdviceReply::Success(reply) => reply.debug = Some(lines),
            AdviceReply::Loading(reply) => reply.debug = Some(lines),
            AdviceReply::Error(reply) => reply.debug = Some(lines),
        }
        self
    }
}
