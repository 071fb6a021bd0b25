//! Single-room WebSocket Chat Relay Library
//!
//! Clients connect, announce a username, and every message is relayed to
//! all participants of the shared room `room1`. Joins and departures are
//! announced by the server.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` owns the `Registry`, the `Room` and one `Session` per
//!   connection, and processes commands one at a time
//! - Each connection has a `handler` task pair talking to the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{serve, RelayServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_rx).run());
//!     serve(listener, cmd_tx).await;
//! }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod participant;
pub mod registry;
pub mod room;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::{NamePolicy, ServerConfig};
pub use error::{AppError, ConfigError, SendError};
pub use handler::{handle_connection, serve};
pub use message::{ClientEvent, Envelope, ErrorCode, ServerEvent};
pub use participant::Participant;
pub use registry::Registry;
pub use room::Room;
pub use server::{RelayServer, ServerCommand};
pub use session::{Session, SessionState};
pub use types::{ConnectionId, RoomName};
