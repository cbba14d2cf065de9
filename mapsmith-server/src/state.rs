//! Shared per-process state handed to every handler.

use mapsmith::{OllamaClient, Settings};

use crate::uploads::UploadStore;

/// Application state: configuration, the generation client, and the
/// upload-content store. Cloning is cheap; the store shares its map and
/// the client shares its connection pool.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: OllamaClient,
    pub uploads: UploadStore,
}

impl AppState {
    /// Builds state from resolved settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let client = OllamaClient::new(&settings.ollama);
        let uploads = UploadStore::new(settings.upload_ttl_secs);
        Self {
            settings,
            client,
            uploads,
        }
    }
}
