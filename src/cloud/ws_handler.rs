use super::hub::CloudHub;
use super::messages::{ClientMessage, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Drive one viewer connection: send the full snapshot as the first event,
/// then forward broadcast events until the socket closes. Inbound traffic
/// is limited to the clear command.
pub async fn handle_connection(socket: WebSocket, hub: Arc<CloudHub>) {
    let session = hub.register_viewer();
    let viewer_id = session.id;
    let (mut sender, receiver) = socket.split();

    // Bootstrap: the snapshot rides the same event as incremental updates,
    // so a fresh viewer needs no special casing client-side.
    let snapshot = ServerMessage::NewWords {
        words: session.snapshot,
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    if sender.send(Message::Text(json)).await.is_err() {
        hub.unregister_viewer(viewer_id);
        return;
    }

    // Task to forward broadcast events to the WebSocket
    let mut events = session.events;
    let send_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(msg) => {
                    debug!(?msg, "Forwarding event to viewer");
                    let json = serde_json::to_string(&msg).unwrap();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(viewer_id = %viewer_id, skipped, "Viewer lagged, dropping connection");
                    break;
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Task to receive commands from the WebSocket
    let recv_task = tokio::spawn(receive_loop(receiver, hub.clone()));

    // Either task ending means the connection is done
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    hub.unregister_viewer(viewer_id);
}

async fn receive_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    hub: Arc<CloudHub>,
) {
    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        debug!(raw = %text, "Received message");

        let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) else {
            warn!(raw = %text, "Failed to parse client message");
            continue;
        };

        match client_msg {
            ClientMessage::ClearCloud => hub.clear(),
        }
    }
}
