use thiserror::Error;

/// Errors raised while talking to the provider.
///
/// These never leave the crate: the public gateway operations swallow every
/// failure into the mock fallback. The type exists so the request helpers
/// can report what went wrong to the log.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
