use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Reset the cloud for every viewer. No payload.
    ClearCloud,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Words to add to the displayed cloud. Repeats are meaningful: each
    /// occurrence represents one increment. An empty list means reset to
    /// blank. The same event carries incremental updates, the full-state
    /// snapshot sent on connect, and the clear signal.
    NewWords { words: Vec<String> },
}
