//! WebSocket connection handler
//!
//! Accepts TCP connections, performs the WebSocket handshake, decodes client
//! events and forwards them to the RelayServer; writes outbound events back
//! to the socket.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::config::CONNECTION_BUFFER_SIZE;
use crate::error::AppError;
use crate::message::{ClientEvent, ServerEvent};
use crate::server::{send_command, ServerCommand};
use crate::types::ConnectionId;

/// Accept loop: one handler task per inbound connection
///
/// Runs until the listener fails permanently; individual accept errors are
/// logged and skipped.
pub async fn serve(listener: TcpListener, cmd_tx: mpsc::Sender<ServerCommand>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a new TCP connection
///
/// Performs WebSocket handshake, sets up bidirectional communication,
/// and manages the connection lifecycle.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let conn_id = ConnectionId::new();
    info!("Connection {} established from {}", conn_id, peer_addr);

    // Channel for server -> client events
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(CONNECTION_BUFFER_SIZE);

    // Register with RelayServer
    if let Err(e) = send_command(
        &cmd_tx,
        ServerCommand::Connect {
            conn_id,
            sender: event_tx.clone(),
        },
    )
    .await
    {
        error!("Failed to register {} - server closed", conn_id);
        return Err(e);
    }

    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let read_task = tokio::spawn(async move {
        while let Some(frame) = ws_receiver.next().await {
            let parsed = match frame {
                Ok(Message::Text(text)) => ClientEvent::parse(&text),
                Ok(Message::Binary(data)) => ClientEvent::parse_bytes(&data),
                Ok(Message::Close(_)) => {
                    debug!("Connection {} sent close frame", conn_id);
                    break;
                }
                Ok(_) => {
                    // Ping/Pong are answered by tungstenite
                    continue;
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", conn_id, e);
                    break;
                }
            };

            match parsed {
                Ok(event) => {
                    let cmd = client_event_to_command(conn_id, event);
                    if send_command(&cmd_tx_read, cmd).await.is_err() {
                        debug!("Server closed, ending read task for {}", conn_id);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Invalid event from {}: {}", conn_id, e);
                    if event_tx.send(e.into()).await.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Read task ended for {}", conn_id);
    });

    // Spawn write task (ServerEvent -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                }
            }
        }
        debug!("Write task ended for {}", conn_id);

        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", conn_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", conn_id);
        }
    }

    let _ = send_command(&cmd_tx, ServerCommand::Disconnect { conn_id }).await;

    info!("Connection {} closed", conn_id);

    Ok(())
}

/// Convert a ClientEvent to a ServerCommand
fn client_event_to_command(conn_id: ConnectionId, event: ClientEvent) -> ServerCommand {
    match event {
        ClientEvent::Join { name } => ServerCommand::Join { conn_id, name },
        ClientEvent::Msg { msg } => ServerCommand::Message { conn_id, msg },
    }
}
