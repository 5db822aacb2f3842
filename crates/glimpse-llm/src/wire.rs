//! Serde types for the provider's chat-completions JSON surface.
//!
//! Requests carry a model id, an ordered list of role-tagged messages and a
//! `max_tokens` cap. Message content is either a plain string or a list of
//! parts mixing text and an image reference. Responses carry a list of
//! candidate completions; only the first one's text is used.

use serde::{Deserialize, Serialize};

/// Outbound chat-completions request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
}

/// A role-tagged message on the wire
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: WireContent,
}

impl WireMessage {
    /// System instruction with plain text content
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: WireContent::Text(text.into()),
        }
    }

    /// User turn with plain text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: WireContent::Text(text.into()),
        }
    }

    /// User turn with structured multimodal parts
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content: WireContent::Parts(parts),
        }
    }
}

/// Message content: plain text or multimodal parts
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One part of a multimodal user turn.
///
/// `image_url` carries the full data URL as a plain string, which is how
/// the provider accepts inline images.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: url.into(),
        }
    }
}

/// Inbound chat-completions response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// Text of the first candidate completion
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: String,
    pub content: String,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_message_serializes_flat() {
        let msg = WireMessage::system("You are helpful.");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are helpful.");
    }

    #[test]
    fn test_multimodal_parts_serialize_tagged() {
        let msg = WireMessage::user_parts(vec![
            ContentPart::text("Transcribe this."),
            ContentPart::image_url("data:image/png;base64,AAAA"),
        ]);
        let json = serde_json::to_value(&msg).unwrap();
        let parts = json["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_request_body_shape() {
        let req = ChatCompletionRequest {
            model: "pixtral-12b-2409".to_string(),
            messages: vec![WireMessage::user("hi")],
            max_tokens: 1000,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "pixtral-12b-2409");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_response_first_content() {
        let body = r#"{
            "id": "cmpl-1",
            "model": "mistral-large-latest",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.first_content(), Some("hello"));
        assert_eq!(parsed.usage.total_tokens, 4);
    }

    #[test]
    fn test_response_without_choices() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(parsed.first_content(), None);
    }
}
