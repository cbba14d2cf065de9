//! Per-upload content retention for follow-up question generation.
//!
//! Each upload is stored once under a fresh id with a bounded lifetime, and
//! follow-up requests pass that id explicitly. Expired entries are evicted
//! on every insert and never served from lookups.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredUpload {
    text: String,
    stored_at: DateTime<Utc>,
}

/// Shared store of uploaded document text, keyed by upload id.
#[derive(Debug, Clone)]
pub struct UploadStore {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<Uuid, StoredUpload>>>,
}

impl UploadStore {
    /// Creates a store whose entries live for `ttl_secs` seconds.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(i64::MAX as u64) as i64),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores the text of one upload and returns its id, evicting every
    /// expired entry along the way.
    pub fn insert(&self, text: String) -> Uuid {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| now - entry.stored_at < self.ttl);
        entries.insert(
            id,
            StoredUpload {
                text,
                stored_at: now,
            },
        );
        id
    }

    /// Returns the stored text for `id` unless it has expired.
    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<String> {
        let entries = self.entries.read();
        let entry = entries.get(id)?;
        if Utc::now() - entry.stored_at < self.ttl {
            Some(entry.text.clone())
        } else {
            None
        }
    }

    /// Number of live (possibly expired but not yet evicted) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
