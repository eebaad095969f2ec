//! PullString Conversation API client.
//!
//! The remote service owns all dialogue state; this module only knows how
//! to issue one authenticated POST per operation and decode the turn
//! response. No retries, no caching, no request batching.

pub mod bot;
pub mod client;
pub mod request;
pub mod response;

pub use bot::Bot;
pub use client::ConversationClient;
pub use request::{Event, StartRequest, TurnRequest};
pub use response::{OutputItem, TurnResponse};

use thiserror::Error;

/// Named entity values understood by a PullString project.
pub type Entities = serde_json::Map<String, serde_json::Value>;

/// Errors surfaced by the conversation client.
///
/// Application-level errors embedded in an otherwise valid JSON body are
/// not distinguished from success here; callers interpret the absence of
/// expected fields themselves.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Non-success HTTP status from the service.
    #[error("API error: {0}")]
    Api(String),
    /// Transport-level failure (connectivity, timeout).
    #[error("Network error: {0}")]
    Network(String),
    /// Response body was not decodable as a turn response.
    #[error("JSON error: {0}")]
    Json(String),
    /// Required configuration was missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

/// The two wire operations of the Conversation API.
///
/// Everything else (`say`, `change`, `fire`, `get`, `set`) is a turn
/// request with exactly one optional field populated. The trait is the
/// seam for substituting the HTTP client in tests.
#[async_trait::async_trait]
pub trait ConversationApi: Send + Sync {
    /// Create a new conversation for a project. POSTs to
    /// `{base}/conversation`.
    ///
    /// # Errors
    ///
    /// Returns `ConversationError::Network` on connectivity issues,
    /// `ConversationError::Api` on non-success status codes, or
    /// `ConversationError::Json` if the body does not decode.
    async fn start(
        &self,
        api_key: &str,
        request: &StartRequest,
    ) -> Result<TurnResponse, ConversationError>;

    /// Issue one turn against an existing conversation. POSTs to
    /// `{base}/conversation/{uuid}`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ConversationApi::start`].
    async fn converse(
        &self,
        api_key: &str,
        uuid: &str,
        request: &TurnRequest,
    ) -> Result<TurnResponse, ConversationError>;
}
