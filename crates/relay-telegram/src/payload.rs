//! Message and request body types.

use serde::{Deserialize, Serialize};

/// `parse_mode` value for HTML-formatted text.
pub const PARSE_MODE_HTML: &str = "HTML";

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// HTML text, already escaped.
    pub text: String,
    /// Deliver without sound or vibration.
    pub silent: bool,
}

impl OutboundMessage {
    /// Create a message.
    #[must_use]
    pub fn new(text: impl Into<String>, silent: bool) -> Self {
        Self {
            text: text.into(),
            silent,
        }
    }

    /// A message that notifies the recipient.
    #[must_use]
    pub fn audible(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// A message delivered silently.
    #[must_use]
    pub fn silent(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

/// JSON body of the Bot API `sendMessage` method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    /// Destination chat.
    pub chat_id: String,
    /// Message text.
    pub text: String,
    /// Text markup mode.
    pub parse_mode: String,
    /// Suppress the notification sound.
    pub disable_notification: bool,
}

impl SendMessagePayload {
    /// Build the body for `message` addressed to `chat_id`.
    #[must_use]
    pub fn new(chat_id: impl Into<String>, message: &OutboundMessage) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: message.text.clone(),
            parse_mode: PARSE_MODE_HTML.to_string(),
            disable_notification: message.silent,
        }
    }
}

/// Error body returned by the Bot API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_format() {
        let payload = SendMessagePayload::new("-100", &OutboundMessage::silent("<b>x</b>"));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["chat_id"], "-100");
        assert_eq!(json["text"], "<b>x</b>");
        assert_eq!(json["parse_mode"], "HTML");
        assert_eq!(json["disable_notification"], true);
    }

    #[test]
    fn test_message_constructors() {
        assert!(!OutboundMessage::audible("a").silent);
        assert!(OutboundMessage::silent("a").silent);
        assert_eq!(OutboundMessage::new("t", true).text, "t");
    }

    #[test]
    fn test_api_error_body() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request"}"#).unwrap();
        assert_eq!(body.description.as_deref(), Some("Bad Request"));
    }
}
