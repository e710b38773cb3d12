use std::collections::HashMap;

/// Normalize a submitted word: trim surrounding whitespace and lowercase.
/// Returns None when nothing remains, so empty fields are dropped before
/// they reach the store.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Authoritative mapping from normalized word to submission count
/// (pure state, no I/O). In-memory only, lives for the process lifetime.
///
/// Invariant: every key present has count >= 1. `clear` is the only way
/// counts go down, and it removes everything.
#[derive(Debug, Default)]
pub struct WordStore {
    counts: HashMap<String, u64>,
}

impl WordStore {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Increment the count for an already-normalized word, creating the
    /// entry at 1 if absent.
    pub fn increment(&mut self, word: &str) {
        *self.counts.entry(word.to_string()).or_insert(0) += 1;
    }

    /// Reset the mapping to empty.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Fully materialized copy of the mapping, unaffected by later mutation.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts.clone()
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
