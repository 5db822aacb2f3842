use glimpse_core::DataUrl;
use reqwest::Client;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::mock;
use crate::wire::{ChatCompletionRequest, ChatCompletionResponse, ContentPart, WireMessage};

const EXTRACT_PROMPT: &str =
    "Extract and transcribe all text from this screenshot. Format it clearly and preserve the layout as much as possible.";

const CHAT_SYSTEM_PROMPT: &str =
    "You are an assistant that helps analyze screenshots. The user has uploaded a screenshot with the following extracted text. Answer their questions about this content.";

/// Where a reply's text actually came from.
///
/// The text itself never reveals this; callers that must not distinguish use
/// [`GatewayReply::into_text`]. The tag exists for observability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOrigin {
    /// Real provider output
    Provider,
    /// Mock content served because no credential is configured
    MissingCredential,
    /// Mock content served because the provider call failed
    ProviderError,
}

/// Result of a gateway operation: always text, never an error
#[derive(Debug, Clone)]
pub struct GatewayReply {
    pub text: String,
    pub origin: ReplyOrigin,
}

impl GatewayReply {
    fn provider(text: String) -> Self {
        Self {
            text,
            origin: ReplyOrigin::Provider,
        }
    }

    fn fallback(text: &str, origin: ReplyOrigin) -> Self {
        Self {
            text: text.to_string(),
            origin,
        }
    }

    /// Discard the origin tag
    pub fn into_text(self) -> String {
        self.text
    }

    /// True for either fallback cause
    pub fn is_fallback(&self) -> bool {
        self.origin != ReplyOrigin::Provider
    }
}

/// Client for the external multimodal/text completion provider.
///
/// Both operations degrade transparently: a missing credential or any
/// provider failure yields fixed mock content instead of an error, so the
/// calling layer never needs an error path for the network.
pub struct GatewayClient {
    config: GatewayConfig,
    http: Client,
}

impl GatewayClient {
    /// Create a client. No timeout is configured beyond the transport
    /// default, and each call is a single attempt.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Transcribe the visible text of a screenshot.
    pub async fn extract_text(&self, image: &DataUrl) -> GatewayReply {
        let Some(api_key) = self.config.api_key.clone() else {
            log::warn!("no provider credential configured, serving mock transcript");
            return GatewayReply::fallback(mock::mock_transcript(), ReplyOrigin::MissingCredential);
        };

        match self.request_extraction(&api_key, image).await {
            Ok(text) => GatewayReply::provider(text),
            Err(e) => {
                log::error!("text extraction failed: {e}");
                GatewayReply::fallback(mock::mock_transcript(), ReplyOrigin::ProviderError)
            }
        }
    }

    /// Answer a question about previously extracted context text.
    pub async fn generate_chat_response(&self, user_message: &str, context: &str) -> GatewayReply {
        let Some(api_key) = self.config.api_key.clone() else {
            log::warn!("no provider credential configured, serving mock reply");
            return GatewayReply::fallback(mock::mock_chat_reply(), ReplyOrigin::MissingCredential);
        };

        match self.request_chat(&api_key, user_message, context).await {
            Ok(text) => GatewayReply::provider(text),
            Err(e) => {
                log::error!("chat completion failed: {e}");
                GatewayReply::fallback(mock::mock_chat_reply(), ReplyOrigin::ProviderError)
            }
        }
    }

    async fn request_extraction(&self, api_key: &str, image: &DataUrl) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.vision_model.clone(),
            messages: vec![WireMessage::user_parts(vec![
                ContentPart::text(EXTRACT_PROMPT),
                ContentPart::image_url(image.to_string()),
            ])],
            max_tokens: self.config.extract_max_tokens,
        };
        self.send(api_key, &request).await
    }

    async fn request_chat(&self, api_key: &str, user_message: &str, context: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                WireMessage::system(CHAT_SYSTEM_PROMPT),
                WireMessage::user(format!(
                    "Here is the text extracted from my screenshot:\n\n{context}\n\nMy question is: {user_message}"
                )),
            ],
            max_tokens: self.config.chat_max_tokens,
        };
        self.send(api_key, &request).await
    }

    async fn send(&self, api_key: &str, request: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        body.first_content()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MalformedResponse("no choices in response".to_string()))
    }
}
