use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use wordwall::messages::{ClientMessage, ServerMessage};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, wordwall::app()).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

/// Connect a viewer and consume its snapshot event. Once the snapshot has
/// arrived the viewer's broadcast subscription is live, so later
/// submissions are guaranteed to reach it.
pub async fn connect_viewer(server: &TestServer) -> (WsStream, Vec<String>) {
    let (mut ws, _) = connect_async(&server.ws_url())
        .await
        .expect("Failed to connect");
    let snapshot = recv_words(&mut ws).await;
    (ws, snapshot)
}

pub fn clear_msg() -> Message {
    let json = serde_json::to_string(&ClientMessage::ClearCloud).unwrap();
    Message::Text(json.into())
}

/// Post a submission the way the HTML form does. The handler applies the
/// submission before responding, so the store is up to date on return.
pub async fn submit(server: &TestServer, word1: Option<&str>, word2: Option<&str>) {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let mut form: Vec<(&str, &str)> = Vec::new();
    if let Some(w) = word1 {
        form.push(("word1", w));
    }
    if let Some(w) = word2 {
        form.push(("word2", w));
    }

    let response = client
        .post(server.http_url("/submit"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = ws.next().await.unwrap().unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

/// Receive the next event and unwrap its word list.
pub async fn recv_words(ws: &mut WsStream) -> Vec<String> {
    let ServerMessage::NewWords { words } = recv(ws).await;
    words
}

/// Assert that no event reaches this viewer within a short window.
pub async fn assert_silent(ws: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "expected no event, got {:?}", result);
}

pub fn sorted(mut words: Vec<String>) -> Vec<String> {
    words.sort();
    words
}
