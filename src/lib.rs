mod cloud;
pub mod config;

pub use cloud::messages;

use axum::{
    Router,
    extract::{Form, State, WebSocketUpgrade, ws::WebSocket},
    response::{Redirect, Response},
    routing::{get, post},
};
use cloud::CloudHub;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<CloudHub>,
}

/// Form body of a submission. Both fields optional; empty or whitespace-only
/// values are dropped by the hub.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub word1: Option<String>,
    pub word2: Option<String>,
}

async fn submit(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Redirect {
    state.hub.submit(form.word1.as_deref(), form.word2.as_deref());
    // Submitters go straight back to the form for the next word
    Redirect::to("/form")
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    cloud::handle_connection(socket, state.hub).await;
}

pub fn app() -> Router {
    let state = AppState {
        hub: Arc::new(CloudHub::new()),
    };

    Router::new()
        .route("/health", get(health))
        .route("/submit", post(submit))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
