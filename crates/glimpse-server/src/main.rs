use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glimpse_llm::{GatewayClient, GatewayConfig};
use glimpse_session::{FileSessionStore, SessionStore};
use tracing_subscriber::EnvFilter;

use glimpse_server::controller::AppController;
use glimpse_server::notify::NotificationBus;
use glimpse_server::server::{run_server, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "glimpse-server")]
#[command(about = "Glimpse - screenshot analysis chat server")]
#[command(version)]
struct Cli {
    /// Listen host
    #[arg(long, env = "GLIMPSE_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(long, env = "GLIMPSE_PORT")]
    port: Option<u16>,

    /// Provider API key; without it every AI call serves fixed mock content
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Data directory for the persisted session (default: ~/.glimpse)
    #[arg(long, env = "GLIMPSE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. "info" or "glimpse_server=debug"
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .init();

    let mut server_config = ServerConfig::from_env();
    if let Some(host) = cli.host {
        server_config.host = host;
    }
    if let Some(port) = cli.port {
        server_config.port = port;
    }

    let mut gateway_config = GatewayConfig::from_env();
    if let Some(key) = cli.api_key {
        gateway_config = gateway_config.with_api_key(key);
    }
    if !gateway_config.has_credential() {
        tracing::warn!("no MISTRAL_API_KEY configured; AI calls will serve fixed mock content");
    }

    let store: Arc<dyn SessionStore> = Arc::new(match cli.data_dir {
        Some(dir) => FileSessionStore::new(dir),
        None => FileSessionStore::from_default_location(),
    });

    let notify = NotificationBus::new();
    let controller = Arc::new(AppController::new(
        GatewayClient::new(gateway_config),
        store,
        notify.clone(),
    ));
    controller.restore().await;

    let state = AppState {
        controller,
        notify,
    };

    run_server(state, server_config).await
}
