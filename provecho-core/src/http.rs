//! Shared HTTP client utilities
//!
//! This module provides a shared, lazily-initialized HTTP client for the
//! upstream API calls. Using a single client allows connection pooling and
//! avoids resource duplication.

use reqwest::Client;
use std::sync::OnceLock;

/// Global HTTP client for upstream API calls
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client
///
/// The client carries no request timeout: the chat-completion call is a
/// single best-effort attempt that runs to completion or fails.
pub fn get_client() -> &'static Client {
    HTTP_CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent("provecho/1.0")
            .build()
            .expect("Failed to create HTTP client - this should never fail")
    })
}
