use super::messages::ServerMessage;
use super::store::{WordStore, normalize};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

/// Fan-out channel capacity. A viewer that falls this far behind is
/// disconnected by its forwarding task rather than shown a gapped cloud.
const BROADCAST_CAPACITY: usize = 64;

/// Everything a newly admitted viewer needs: an id for logging, the full
/// current distribution in wire form, and a subscription to future events.
pub struct ViewerSession {
    pub id: Uuid,
    pub snapshot: Vec<String>,
    pub events: broadcast::Receiver<ServerMessage>,
}

/// Mediates between inbound submissions, the clear command, and connected
/// viewers. The store mutex is held across mutate-then-send, so every
/// broadcast reflects a fully applied submission, and a viewer admitted
/// mid-submission sees either the snapshot followed by the delta event or
/// a snapshot that already contains the delta. Never a partial view.
pub struct CloudHub {
    words: Mutex<WordStore>,
    events: broadcast::Sender<ServerMessage>,
    viewers: DashMap<Uuid, Instant>,
}

impl CloudHub {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            words: Mutex::new(WordStore::new()),
            events,
            viewers: DashMap::new(),
        }
    }

    /// Apply one submission of up to two optional words: normalize each in
    /// order, count the non-empty ones, and broadcast exactly the list of
    /// words counted. Duplicates within a submission count twice and are
    /// announced twice. An all-empty submission touches nothing and emits
    /// nothing. Returns the announced list.
    pub fn submit(&self, word1: Option<&str>, word2: Option<&str>) -> Vec<String> {
        let added: Vec<String> = [word1, word2]
            .into_iter()
            .flatten()
            .filter_map(normalize)
            .collect();

        if added.is_empty() {
            debug!("Submission contained no usable words");
            return added;
        }

        let mut words = self.words.lock().unwrap();
        for word in &added {
            words.increment(word);
        }
        info!(submitted = ?added, "Words added to cloud");
        // Fire-and-forget: send only fails when no viewer is connected.
        let _ = self.events.send(ServerMessage::NewWords {
            words: added.clone(),
        });
        added
    }

    /// Admit a new viewer: subscribe it to future events and capture the
    /// full current distribution, atomically with respect to submissions.
    pub fn register_viewer(&self) -> ViewerSession {
        let words = self.words.lock().unwrap();
        let events = self.events.subscribe();
        let snapshot = snapshot_payload(&words.snapshot());
        drop(words);

        let id = Uuid::new_v4();
        self.viewers.insert(id, Instant::now());
        info!(viewer_id = %id, viewers = self.viewers.len(), "Viewer connected");

        ViewerSession {
            id,
            snapshot,
            events,
        }
    }

    /// Reset the store and tell every viewer to blank its display.
    pub fn clear(&self) {
        let mut words = self.words.lock().unwrap();
        words.clear();
        info!("Cloud cleared");
        let _ = self.events.send(ServerMessage::NewWords { words: Vec::new() });
    }

    /// Purely observational. A viewer that reconnects is a brand-new
    /// connection and gets a fresh snapshot.
    pub fn unregister_viewer(&self, id: Uuid) {
        if let Some((_, connected_at)) = self.viewers.remove(&id) {
            info!(
                viewer_id = %id,
                session_secs = connected_at.elapsed().as_secs(),
                viewers = self.viewers.len(),
                "Viewer disconnected"
            );
        }
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }
}

impl Default for CloudHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand (word, count) pairs into the wire form: each word repeated
/// `count` times. O(total submissions) per connect, which keeps the wire
/// protocol down to a single event type. Fine for room-sized crowds.
fn snapshot_payload(counts: &HashMap<String, u64>) -> Vec<String> {
    let mut payload = Vec::new();
    for (word, count) in counts {
        for _ in 0..*count {
            payload.push(word.clone());
        }
    }
    payload
}
