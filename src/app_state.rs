//! Application state shared across all handlers.
//!
//! Built once at startup and cloned into every request; nothing in it is
//! mutated while serving.

use crate::config::Config;
use crate::services::TranscriptStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Date-partitioned transcript persistence
    pub transcript_store: TranscriptStore,
}

impl AppState {
    pub fn new(config: Config, transcript_store: TranscriptStore) -> Self {
        Self {
            config,
            transcript_store,
        }
    }

    /// Shared secret, when signature verification is enabled.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.config.webhook_secret.as_deref()
    }
}
