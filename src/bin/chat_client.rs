//! Terminal chat client
//!
//! Connects to a relay, joins under a username and relays stdin lines as
//! messages. Every received message is printed as `name: msg`.
//!
//! Usage: `chat_client [ws://host:port] [username]`

use std::env;

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::config::{DEFAULT_HOST, DEFAULT_PORT};
use chat_relay::{ClientEvent, ServerEvent};

/// Random name in the `user1`..`user1000` range
fn generate_username() -> String {
    format!("user{}", rand::thread_rng().gen_range(1..=1000))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_client=warn")),
        )
        .init();

    let url = env::args()
        .nth(1)
        .unwrap_or_else(|| format!("ws://{}:{}", DEFAULT_HOST, DEFAULT_PORT));
    let username = env::args().nth(2).unwrap_or_else(generate_username);

    println!("connecting");
    let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    println!("connected");
    info!("Connected to {} as {}", url, username);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let join = serde_json::to_string(&ClientEvent::Join { name: username })?;
    ws_sender.send(Message::Text(join.into())).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::Msg(envelope)) => println!("{}: {}", envelope.name, envelope.msg),
                        Ok(ServerEvent::Error { code, message }) => {
                            eprintln!("error ({:?}): {}", code, message);
                        }
                        Err(e) => debug!("Ignoring unreadable frame: {}", e),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        println!("disconnected");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(msg) => {
                        let event = serde_json::to_string(&ClientEvent::Msg { msg })?;
                        ws_sender.send(Message::Text(event.into())).await?;
                    }
                    None => {
                        // stdin closed
                        let _ = ws_sender.close().await;
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
