//! HTTP server - REST surface over the application controller.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use glimpse_llm::{GatewayReply, ReplyOrigin};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controller::{AppController, ControllerError};
use crate::notify::NotificationBus;

/// Shared application state, created in main and handed to the router
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<AppController>,
    pub notify: NotificationBus,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("GLIMPSE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("GLIMPSE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextRequest {
    pub image_data_url: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub user_message: String,
    #[serde(default)]
    pub extracted_text: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Run the HTTP server until shutdown
pub async fn run_server(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("glimpse server starting on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/extract-text", post(extract_text_handler))
        .route("/chat", post(chat_handler))
        .route("/session", get(get_session_handler))
        .route("/session/clear", post(clear_session_handler))
        .route("/notifications", get(notifications_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn extract_text_handler(
    State(state): State<AppState>,
    Json(req): Json<ExtractTextRequest>,
) -> (StatusCode, Json<Value>) {
    tracing::info!("processing extraction request");

    match state.controller.upload_screenshot(&req.image_data_url).await {
        Ok(reply) => {
            let status = fallback_status(&reply);
            (
                status,
                Json(json!(ExtractTextResponse {
                    text: reply.into_text()
                })),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatMessageRequest>,
) -> (StatusCode, Json<Value>) {
    tracing::info!("processing chat request");

    match state
        .controller
        .send_message(&req.user_message, &req.extracted_text)
        .await
    {
        Ok(Some(outcome)) => {
            let status = fallback_status(&outcome.reply);
            (
                status,
                Json(json!(ChatMessageResponse {
                    response: outcome.reply.into_text()
                })),
            )
        }
        // Empty input is ignored, not an error.
        Ok(None) => (
            StatusCode::OK,
            Json(json!(ChatMessageResponse {
                response: String::new()
            })),
        ),
        Err(e) => error_response(e),
    }
}

async fn get_session_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let snapshot = state.controller.snapshot().await;
    (StatusCode::OK, Json(json!(snapshot)))
}

async fn clear_session_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    state.controller.clear_session().await;
    (StatusCode::OK, Json(json!({ "status": "cleared" })))
}

async fn notifications_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!(state.notify.snapshot())))
}

/// A reply produced by the fallback after a real provider failure keeps the
/// original route behavior: the fallback text ships with a 500. The
/// missing-credential fallback is an ordinary 200.
fn fallback_status(reply: &GatewayReply) -> StatusCode {
    if reply.origin == ReplyOrigin::ProviderError {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

fn error_response(e: ControllerError) -> (StatusCode, Json<Value>) {
    let (status, code) = match &e {
        ControllerError::Busy(_) => (StatusCode::CONFLICT, "BUSY"),
        ControllerError::InvalidImage(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
    };
    (
        status,
        Json(json!(ErrorResponse {
            error: e.to_string(),
            code: code.to_string(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_server_config_from_env() {
        std::env::set_var("GLIMPSE_PORT", "4000");
        std::env::set_var("GLIMPSE_HOST", "127.0.0.1");

        let config = ServerConfig::from_env();
        assert_eq!(config.port, 4000);
        assert_eq!(config.host, "127.0.0.1");

        std::env::remove_var("GLIMPSE_PORT");
        std::env::remove_var("GLIMPSE_HOST");
    }
}
