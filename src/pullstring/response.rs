//! Typed turn responses.
//!
//! The response schema is owned by the remote service; only the fields the
//! client actually reads are modeled, everything else is ignored on decode.

use serde::Deserialize;
use serde_json::Value;

/// One unit of bot response inside a turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputItem {
    /// Plain text to display.
    pub text: Option<String>,
    /// Named side-effect instruction (e.g. `show_image`).
    pub behavior: Option<String>,
    /// Parameters for the behavior, keyed by behavior-specific names.
    pub parameters: Option<serde_json::Map<String, Value>>,
}

impl OutputItem {
    /// For `show_image`, the URL of the image to render.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        if self.behavior.as_deref() != Some("show_image") {
            return None;
        }
        self.parameters
            .as_ref()
            .and_then(|parameters| parameters.get("image"))
            .and_then(Value::as_str)
    }
}

/// Decoded body of a turn response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnResponse {
    /// New or continuing conversation identifier. Must be carried onto the
    /// next turn request; losing it makes the session unresumable.
    pub conversation: Option<String>,
    /// Bot output, in presentation order.
    #[serde(default)]
    pub outputs: Vec<OutputItem>,
    /// Seconds to wait before polling for a bot-initiated continuation.
    pub timed_response_interval: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_documented_fields_and_ignores_the_rest() -> Result<(), serde_json::Error> {
        let response: TurnResponse = serde_json::from_str(
            r#"{
                "conversation": "abc",
                "outputs": [
                    {"type": "dialog", "id": "1", "character": "Host", "text": "Hi there"},
                    {"behavior": "show_image", "parameters": {"image": "https://x/y.png"}}
                ],
                "timed_response_interval": 4.5,
                "etag": "ignored"
            }"#,
        )?;

        assert_eq!(response.conversation.as_deref(), Some("abc"));
        assert_eq!(response.outputs.len(), 2);
        assert_eq!(response.outputs[0].text.as_deref(), Some("Hi there"));
        assert_eq!(response.outputs[1].image_url(), Some("https://x/y.png"));
        assert_eq!(response.timed_response_interval, Some(4.5));
        Ok(())
    }

    #[test]
    fn missing_outputs_decode_as_empty() -> Result<(), serde_json::Error> {
        let response: TurnResponse = serde_json::from_str(r#"{"conversation": "abc"}"#)?;
        assert!(response.outputs.is_empty());
        assert_eq!(response.timed_response_interval, None);
        Ok(())
    }

    #[test]
    fn image_url_requires_the_show_image_behavior() {
        let mut parameters = serde_json::Map::new();
        parameters.insert("image".to_string(), serde_json::json!("https://x/y.png"));
        let item = OutputItem {
            behavior: Some("play_sound".to_string()),
            parameters: Some(parameters),
            ..OutputItem::default()
        };
        assert_eq!(item.image_url(), None);
    }
}
