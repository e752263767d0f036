pub mod advice;
pub mod cleanup;
pub mod config;
pub mod http;
pub mod models;
pub mod prompt;
pub mod trace;

// Re-export commonly used types
pub use advice::{AdviceError, advise};
pub use config::Config;
pub use models::{
    AdviceReply, AdviceRequest, ChatRequest, ErrorReply, LoadingReply, Message, SuccessReply,
};
pub use prompt::PromptStyle;
pub use trace::Trace;
