//! Prompt construction for the advice pipeline

use std::fmt;
use std::str::FromStr;

use crate::models::Message;

/// System instruction for the structured style. Keeps the model on a bare
/// numbered list so the reasoning cleanup has less to do.
const STRUCTURED_SYSTEM_PROMPT: &str = "Eres un asistente de cocina. Responde con exactamente \
3 consejos muy cortos en español para cocinar o aprovechar el alimento que indique el usuario. \
Formato: lista numerada (1., 2., 3.). Sin introducción, sin razonamiento previo, sin emojis.";

/// Prompt templates understood by the advice pipeline.
///
/// `Direct` embeds the food name in a single user message and asks the model
/// to skip the introduction. `Structured` moves the format rules into a
/// system message and sends only the food name as the user turn; output for
/// this style additionally goes through the reasoning-preamble cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStyle {
    #[default]
    Direct,
    Structured,
}

impl PromptStyle {
    /// Whether model output for this style gets the reasoning cleanup pass
    #[must_use]
    pub fn strips_reasoning(self) -> bool {
        matches!(self, PromptStyle::Structured)
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStyle::Direct => write!(f, "direct"),
            PromptStyle::Structured => write!(f, "structured"),
        }
    }
}

impl FromStr for PromptStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(PromptStyle::Direct),
            "structured" => Ok(PromptStyle::Structured),
            other => anyhow::bail!("unknown prompt style: {}", other),
        }
    }
}

/// Build the message sequence for a food query under the given style
#[must_use]
pub fn build_messages(style: PromptStyle, food: &str) -> Vec<Message> {
    match style {
        PromptStyle::Direct => vec![Message::user(format!(
            "Dame 3 consejos muy cortos en español para cocinar o aprovechar: {}. \
             Solo los consejos, sin introducción.",
            food
        ))],
        PromptStyle::Structured => vec![
            Message::system(STRUCTURED_SYSTEM_PROMPT),
            Message::user(food.to_string()),
        ],
    }
}
