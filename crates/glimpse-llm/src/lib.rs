pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod wire;

// Re-export core types
pub use client::{GatewayClient, GatewayReply, ReplyOrigin};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
