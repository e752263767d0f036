//! The advice pipeline: prompt, upstream call, body interpretation
//!
//! Everything the upstream can get wrong (bad JSON, error payloads, missing
//! choices, empty text) is a soft outcome carried over HTTP 200; only
//! transport failures escape as [`AdviceError`] and surface as HTTP 500.

use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::cleanup;
use crate::config::{Config, TEMPERATURE};
use crate::http::get_client;
use crate::models::{AdviceReply, ChatRequest, ErrorReply, LoadingReply, SuccessReply};
use crate::prompt;
use crate::trace::Trace;

/// Maximum number of raw-body characters echoed back in error payloads
const RAW_ECHO_LIMIT: usize = 500;

/// Advisory shown while the hosted model is still spinning up
const LOADING_MESSAGE: &str = "⏳ El modelo se está cargando. Espera 20-30 segundos y reintenta.";

/// Failure that escapes the soft-error envelope
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("request to the model endpoint failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl AdviceError {
    /// Short failure-kind name, reported in the `error_type` payload field
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AdviceError::Upstream(_) => "UpstreamRequestError",
        }
    }
}

/// Run the full advice pipeline for one food query.
///
/// A single best-effort call: no retry, no timeout. The elapsed upstream
/// time is reported back in the success payload.
pub async fn advise(
    food: &str,
    config: &Config,
    trace: &mut Trace,
) -> Result<AdviceReply, AdviceError> {
    trace.log(format!("Food received: \"{}\"", food));
    trace.log(format!("Model: {}", config.model));
    trace.log(format!("Endpoint: {}", config.api_url));

    let request = ChatRequest {
        model: config.model.clone(),
        messages: prompt::build_messages(config.prompt_style, food),
        max_tokens: config.max_tokens,
        temperature: TEMPERATURE,
    };

    let client = get_client();
    let start = Instant::now();

    let response = client
        .post(&config.api_url)
        .header("Authorization", format!("Bearer {}", config.api_token))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let elapsed_ms = start.elapsed().as_millis();
    let status = response.status();
    trace.log(format!("Upstream call completed in {}ms", elapsed_ms));
    trace.log(format!("Status: {}", status));

    // The body shape decides the outcome; the upstream status is logged only
    let raw = response.text().await?;
    trace.log(format!(
        "Raw response length: {} characters",
        raw.chars().count()
    ));

    info!(
        status = %status,
        duration_ms = %elapsed_ms,
        "chat completion call finished"
    );

    Ok(interpret_body(&raw, elapsed_ms, config, trace))
}

/// Interpret an upstream response body. All outcomes here are soft results.
fn interpret_body(raw: &str, elapsed_ms: u128, config: &Config, trace: &mut Trace) -> AdviceReply {
    let body: Value = match serde_json::from_str(raw) {
        Ok(body) => body,
        Err(err) => {
            warn!("upstream body is not valid JSON: {}", err);
            trace.log(format!("JSON parse error: {}", err));
            let mut reply = ErrorReply::new("Respuesta no válida del modelo");
            reply.raw_response = Some(truncate_chars(raw, RAW_ECHO_LIMIT));
            reply.parse_error = Some(err.to_string());
            return AdviceReply::Error(reply);
        }
    };
    trace.log("JSON parsed OK");

    if let Some(error) = body.get("error") {
        return interpret_upstream_error(error, trace);
    }

    let Some(text) = extract_text(&body, trace) else {
        let keys = top_level_keys(&body);
        trace.log(format!(
            "No generated text found; available keys: {}",
            keys.join(", ")
        ));
        let mut reply = ErrorReply::new("Formato de respuesta inesperado");
        reply.available_keys = Some(keys);
        reply.raw_data = Some(body);
        return AdviceReply::Error(reply);
    };

    let text = text.trim();
    let cleaned = if config.prompt_style.strips_reasoning() {
        cleanup::strip_reasoning(text)
    } else {
        text.to_string()
    };
    trace.log(format!(
        "Final text length: {} characters",
        cleaned.chars().count()
    ));

    if cleaned.is_empty() {
        return AdviceReply::Error(ErrorReply::new("El modelo no generó texto"));
    }

    AdviceReply::Success(SuccessReply {
        generated_text: cleaned,
        model_used: config.model.clone(),
        processing_time: format!("{}ms", elapsed_ms),
        success: true,
        debug: None,
    })
}

/// Interpret the `error` field of an upstream body
fn interpret_upstream_error(error: &Value, trace: &mut Trace) -> AdviceReply {
    warn!("upstream returned an error payload: {}", error);
    trace.log(format!("Upstream error: {}", error));

    if let Some(text) = error.as_str() {
        if text.contains("loading") {
            return AdviceReply::Loading(LoadingReply {
                generated_text: LOADING_MESSAGE.to_string(),
                is_loading: true,
                debug: None,
            });
        }
    }

    if let Some(message) = error.get("message").and_then(Value::as_str) {
        let mut reply = ErrorReply::new(format!("Error del modelo: {}", message));
        reply.full_error = Some(error.clone());
        return AdviceReply::Error(reply);
    }

    AdviceReply::Error(ErrorReply::new(format!("Error: {}", error)))
}

/// Pull the generated text out of an OpenAI-style success body.
///
/// Looks for `choices[0].message.content`, falling back to the legacy
/// `choices[0].text` completion shape.
fn extract_text(body: &Value, trace: &mut Trace) -> Option<String> {
    let choice = body.get("choices")?.as_array()?.first()?;
    trace.log("Found choices[0]");

    if let Some(content) = choice.pointer("/message/content").and_then(Value::as_str) {
        trace.log("Text extracted from message.content");
        return Some(content.to_string());
    }

    if let Some(text) = choice.get("text").and_then(Value::as_str) {
        trace.log("Text extracted from text field");
        return Some(text.to_string());
    }

    None
}

fn top_level_keys(body: &Value) -> Vec<String> {
    body.as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptStyle;

    fn test_config(style: PromptStyle) -> Config {
        Config {
            api_token: "hf_test".to_string(),
            api_url: "http://127.0.0.1:9/unused".to_string(),
            model: "test/model".to_string(),
            max_tokens: 200,
            prompt_style: style,
            debug_trace: true,
        }
    }

    fn interpret(raw: &str, style: PromptStyle) -> AdviceReply {
        let mut trace = Trace::new();
        interpret_body(raw, 42, &test_config(style), &mut trace)
    }

    #[test]
    fn test_success_from_message_content() {
        let raw = r#"{"choices":[{"message":{"content":"  1. Tip A\n2. Tip B\n3. Tip C  "}}]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Success(reply) => {
                assert_eq!(reply.generated_text, "1. Tip A\n2. Tip B\n3. Tip C");
                assert_eq!(reply.model_used, "test/model");
                assert_eq!(reply.processing_time, "42ms");
                assert!(reply.success);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_success_falls_back_to_text_field() {
        let raw = r#"{"choices":[{"text":"1. Tip A"}]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Success(reply) => assert_eq!(reply.generated_text, "1. Tip A"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_style_applies_reasoning_cleanup() {
        let raw = r#"{"choices":[{"message":{"content":"Okay, the user wants mango tips.\n1. Tip A\n2. Tip B"}}]}"#;

        match interpret(raw, PromptStyle::Structured) {
            AdviceReply::Success(reply) => {
                assert_eq!(reply.generated_text, "1. Tip A\n2. Tip B");
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_direct_style_keeps_preamble() {
        let raw = r#"{"choices":[{"message":{"content":"Okay, the user wants mango tips.\n1. Tip A"}}]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Success(reply) => {
                assert!(reply.generated_text.starts_with("Okay"));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_loading_error_string() {
        let raw = r#"{"error":"model HuggingFaceTB/SmolLM3-3B is currently loading"}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Loading(reply) => {
                assert!(reply.is_loading);
                assert!(reply.generated_text.contains("20-30 segundos"));
            }
            other => panic!("expected loading, got {:?}", other),
        }
    }

    #[test]
    fn test_error_object_with_message() {
        let raw = r#"{"error":{"message":"insufficient credits","code":402}}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert_eq!(reply.error_detail, "Error del modelo: insufficient credits");
                assert_eq!(reply.full_error.unwrap()["code"], 402);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_error_value() {
        let raw = r#"{"error":["unexpected","shape"]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert!(reply.error_detail.starts_with("Error: "));
                assert!(reply.error_detail.contains("unexpected"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_loading_error_string_is_generic() {
        let raw = r#"{"error":"boom"}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => assert!(reply.error_detail.contains("boom")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_echoes_truncated_raw() {
        let raw = "x".repeat(800);

        match interpret(&raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert_eq!(reply.error_detail, "Respuesta no válida del modelo");
                assert_eq!(reply.raw_response.unwrap().chars().count(), 500);
                assert!(reply.parse_error.is_some());
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_choices_lists_available_keys() {
        let raw = r#"{"id":"cmpl-1","object":"chat.completion"}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert_eq!(reply.error_detail, "Formato de respuesta inesperado");
                let keys = reply.available_keys.unwrap();
                assert!(keys.contains(&"id".to_string()));
                assert!(keys.contains(&"object".to_string()));
                assert!(reply.raw_data.is_some());
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_choices_is_extraction_error() {
        let raw = r#"{"choices":[]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert_eq!(reply.error_detail, "Formato de respuesta inesperado");
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_choice_without_text_fields_is_extraction_error() {
        let raw = r#"{"choices":[{"finish_reason":"stop"}]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert_eq!(reply.error_detail, "Formato de respuesta inesperado");
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_content_is_empty_text_error() {
        let raw = r#"{"choices":[{"message":{"content":"   \n  "}}]}"#;

        match interpret(raw, PromptStyle::Direct) {
            AdviceReply::Error(reply) => {
                assert_eq!(reply.error_detail, "El modelo no generó texto");
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_trace_collects_pipeline_steps() {
        let mut trace = Trace::new();
        let raw = r#"{"choices":[{"message":{"content":"1. Tip"}}]}"#;
        interpret_body(raw, 42, &test_config(PromptStyle::Direct), &mut trace);

        let lines = trace.into_lines();
        assert!(lines.iter().any(|line| line == "JSON parsed OK"));
        assert!(lines.iter().any(|line| line == "Found choices[0]"));
    }
}
