/// Chat-completions endpoint of the provider
pub const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// Vision-capable model used for text extraction
pub const VISION_MODEL: &str = "pixtral-12b-2409";

/// Text model used for chat
pub const CHAT_MODEL: &str = "mistral-large-latest";

/// Output cap for an extraction call
pub const EXTRACT_MAX_TOKENS: u32 = 1000;

/// Output cap for a chat call
pub const CHAT_MAX_TOKENS: u32 = 500;

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Gateway configuration.
///
/// Model identifiers and token caps are fixed constants; the only runtime
/// surface is the credential, whose absence switches every call to the
/// deterministic mock fallback.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub vision_model: String,
    pub chat_model: String,
    pub extract_max_tokens: u32,
    pub chat_max_tokens: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: MISTRAL_API_URL.to_string(),
            api_key: None,
            vision_model: VISION_MODEL.to_string(),
            chat_model: CHAT_MODEL.to_string(),
            extract_max_tokens: EXTRACT_MAX_TOKENS,
            chat_max_tokens: CHAT_MAX_TOKENS,
        }
    }
}

impl GatewayConfig {
    /// Default configuration with the credential read from `MISTRAL_API_KEY`
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    /// Set the credential
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the endpoint (for tests or compatible providers)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Whether a credential is configured at all
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
