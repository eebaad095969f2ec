//! HTTP client for the Conversation API.
//!
//! One POST per operation against a fixed base URL, bearer-authenticated,
//! JSON in and out. Failures map onto [`ConversationError`]; no retry is
//! attempted at this layer.

use super::{ConversationApi, ConversationError, StartRequest, TurnRequest, TurnResponse};
use reqwest::{Client as HttpClient, Request};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Fixed base of the PullString Conversation REST API.
pub const BASE_URL: &str = "https://conversation.pullstring.ai/v1";

/// Conversation API client. One instance is shared by every bot; the API
/// key travels per call because each bot carries its own credential.
pub struct ConversationClient {
    http: HttpClient,
    base_url: String,
}

impl ConversationClient {
    /// Create a client against [`BASE_URL`] with the given request timeout.
    ///
    /// The timeout prevents infinite hangs when the service is slow or
    /// unresponsive.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(BASE_URL, timeout)
    }

    /// Create a client against an arbitrary base URL. Trailing slashes are
    /// tolerated.
    #[must_use]
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for an endpoint path such as `conversation` or
    /// `conversation/{uuid}`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Build the POST request for an endpoint without sending it: bearer
    /// authorization, JSON content negotiation, serialized body.
    ///
    /// # Errors
    ///
    /// Returns `ConversationError::Json` if the body fails to serialize or
    /// the URL is invalid.
    pub fn build_request<B: Serialize>(
        &self,
        api_key: &str,
        endpoint: &str,
        body: &B,
    ) -> Result<Request, ConversationError> {
        self.http
            .post(self.endpoint_url(endpoint))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Accept", "application/json")
            .json(body)
            .build()
            .map_err(|e| ConversationError::Json(e.to_string()))
    }

    async fn execute(&self, request: Request) -> Result<TurnResponse, ConversationError> {
        debug!(url = %request.url(), "Conversation API request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ConversationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConversationError::Api(format_http_error(
                status.as_u16(),
                &error_text,
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ConversationError::Json(e.to_string()))
    }
}

/// Formats a non-success status and body into an error message, truncating
/// very long bodies. Truncation lands on a char boundary so multibyte
/// bodies cannot panic the error path.
#[must_use]
pub fn format_http_error(status: u16, body: &str) -> String {
    if body.len() > 500 {
        let mut cut = 500;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "Conversation API error: {status} - {}... (truncated)",
            &body[..cut]
        )
    } else {
        format!("Conversation API error: {status} - {body}")
    }
}

#[async_trait::async_trait]
impl ConversationApi for ConversationClient {
    async fn start(
        &self,
        api_key: &str,
        request: &StartRequest,
    ) -> Result<TurnResponse, ConversationError> {
        let request = self.build_request(api_key, "conversation", request)?;
        self.execute(request).await
    }

    async fn converse(
        &self,
        api_key: &str,
        uuid: &str,
        request: &TurnRequest,
    ) -> Result<TurnResponse, ConversationError> {
        let request = self.build_request(api_key, &format!("conversation/{uuid}"), request)?;
        self.execute(request).await
    }
}
