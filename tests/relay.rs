use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use chat_relay::{serve, ClientEvent, Envelope, ErrorCode, RelayServer, ServerEvent};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (cmd_tx, cmd_rx) = mpsc::channel(64);

    tokio::spawn(RelayServer::new(cmd_rx).run());
    tokio::spawn(serve(listener, cmd_tx));

    format!("ws://{}", addr)
}

async fn connect(url: &str) -> Client {
    let (ws, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    ws
}

async fn send(client: &mut Client, event: ClientEvent) {
    let json = serde_json::to_string(&event).unwrap();
    client.send(Message::Text(json.into())).await.unwrap();
}

async fn recv(client: &mut Client) -> ServerEvent {
    loop {
        let frame = timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

fn msg(name: &str, text: &str) -> ServerEvent {
    Envelope::new(name, text).into()
}

#[tokio::test]
async fn test_join_chat_leave() {
    let url = start_relay().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    send(&mut a, ClientEvent::Join { name: "A".to_string() }).await;
    assert_eq!(recv(&mut a).await, msg("server", "There are 0 users online"));
    assert_eq!(recv(&mut a).await, msg("server", "You joined the room"));

    send(&mut b, ClientEvent::Join { name: "B".to_string() }).await;
    assert_eq!(recv(&mut b).await, msg("server", "There are 1 users online"));
    assert_eq!(recv(&mut b).await, msg("server", "You joined the room"));
    assert_eq!(recv(&mut a).await, msg("server", "B has joined the room."));

    send(&mut a, ClientEvent::Msg { msg: "hi".to_string() }).await;
    assert_eq!(recv(&mut a).await, msg("A", "hi"));
    assert_eq!(recv(&mut b).await, msg("A", "hi"));

    b.close(None).await.unwrap();
    assert_eq!(recv(&mut a).await, msg("server", "B has left the room."));
}

#[tokio::test]
async fn test_protocol_misuse_is_reported() {
    let url = start_relay().await;
    let mut a = connect(&url).await;

    send(&mut a, ClientEvent::Msg { msg: "too early".to_string() }).await;
    match recv(&mut a).await {
        ServerEvent::Error { code, .. } => assert_eq!(code, ErrorCode::NotJoined),
        other => panic!("unexpected event: {:?}", other),
    }

    a.send(Message::Text(r#"{"event":"join","data":{}}"#.to_string().into()))
        .await
        .unwrap();
    match recv(&mut a).await {
        ServerEvent::Error { code, .. } => assert_eq!(code, ErrorCode::InvalidMessage),
        other => panic!("unexpected event: {:?}", other),
    }

    // The session is still usable after rejected events
    send(&mut a, ClientEvent::Join { name: "A".to_string() }).await;
    assert_eq!(recv(&mut a).await, msg("server", "There are 0 users online"));
}
