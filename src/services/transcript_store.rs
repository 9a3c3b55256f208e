//! Date-partitioned persistence of post-call transcription payloads.
//!
//! Files land at `<root>/<YYYY-MM-DD>/<HH-MM-SS>_<conversation_id>.json`
//! using the UTC time at the moment of persistence. Two events for the same
//! conversation within one second map to the same path and the later write
//! replaces the earlier one.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{storage, webhook};
use crate::models::{sanitize_file_component, WebhookEvent};
use crate::services::clock::{Clock, SystemClock};

/// Result of handing a verified payload to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// A transcript file was written.
    Saved {
        path: PathBuf,
        conversation_id: String,
    },
    /// The event kind is not persisted.
    Ignored { event_type: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Failed to encode transcript: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes qualifying webhook payloads below a root directory.
#[derive(Clone)]
pub struct TranscriptStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl TranscriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the transcript root if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), PersistError> {
        create_dir_all(&self.root).await
    }

    /// Date partition for `now`.
    pub fn day_dir(&self, now: DateTime<Utc>) -> PathBuf {
        self.root
            .join(now.format(storage::DAY_DIR_FORMAT).to_string())
    }

    /// Full target path for a conversation persisted at `now`.
    pub fn transcript_path(&self, now: DateTime<Utc>, conversation_id: &str) -> PathBuf {
        let file_name = format!(
            "{}_{}.{}",
            now.format(storage::FILE_TIME_FORMAT),
            sanitize_file_component(conversation_id),
            storage::FILE_EXTENSION
        );
        self.day_dir(now).join(file_name)
    }

    /// Create the date partition for `now`, along with any missing ancestors.
    ///
    /// Succeeds when the directory already exists, including when a
    /// concurrent request created it first.
    pub async fn ensure_day_dir(&self, now: DateTime<Utc>) -> Result<PathBuf, PersistError> {
        let dir = self.day_dir(now);
        create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Parse a raw body and persist it if it is a post-call transcription.
    pub async fn persist(&self, payload: &[u8]) -> Result<PersistOutcome, PersistError> {
        let value: Value = serde_json::from_slice(payload).map_err(PersistError::InvalidJson)?;
        let event = WebhookEvent::from_value(value).ok_or(PersistError::NotAnObject)?;

        let event_type = event.event_type();
        info!(event_type = %event_type, "Webhook received");

        if event_type != webhook::POST_CALL_TRANSCRIPTION {
            info!(event_type = %event_type, "Ignoring event type");
            return Ok(PersistOutcome::Ignored {
                event_type: event_type.to_string(),
            });
        }

        let conversation_id = event.conversation_id();
        let contents = serde_json::to_string_pretty(event.body()).map_err(PersistError::Encode)?;

        let now = self.clock.now();
        self.ensure_day_dir(now).await?;
        let path = self.transcript_path(now, &conversation_id);

        debug!(path = %path.display(), bytes = contents.len(), "Writing transcript");
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            conversation_id = %conversation_id,
            "Saved transcript"
        );

        Ok(PersistOutcome::Saved {
            path,
            conversation_id,
        })
    }
}

async fn create_dir_all(path: &Path) -> Result<(), PersistError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| PersistError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}
