//! Chat relay - Entry Point
//!
//! Starts the TCP listener and RelayServer actor, accepting connections.

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_relay::config::COMMAND_BUFFER_SIZE;
use chat_relay::{serve, RelayServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Chat relay listening on {}", config.addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
    let server = RelayServer::with_policy(cmd_rx, config.name_policy);
    tokio::spawn(server.run());

    info!("RelayServer actor started ({:?} duplicate names)", config.name_policy);

    serve(listener, cmd_tx).await;

    Ok(())
}
