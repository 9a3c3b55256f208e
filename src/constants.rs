//! Application constants and configuration values.
//!
//! This module centralizes the wire names and default settings shared by the
//! handlers, the persister and the configuration loader.

/// Service identity constants
pub mod service {
    /// Name reported by the health endpoint and used as the log target prefix
    pub const NAME: &str = "alfred-talk-webhook";
}

/// Webhook wire constants
pub mod webhook {
    /// Route receiving ElevenLabs callbacks
    pub const ROUTE: &str = "/elevenlabs-webhook";

    /// Header carrying `t=<timestamp>,v1=<hex-digest>`
    pub const SIGNATURE_HEADER: &str = "elevenlabs-signature";

    /// The only event type that is persisted
    pub const POST_CALL_TRANSCRIPTION: &str = "post_call_transcription";

    /// Fallback for a missing event type or conversation id
    pub const UNKNOWN: &str = "unknown";
}

/// Transcript storage constants
pub mod storage {
    /// Date partition directory format (UTC)
    pub const DAY_DIR_FORMAT: &str = "%Y-%m-%d";

    /// Per-file time prefix format (UTC)
    pub const FILE_TIME_FORMAT: &str = "%H-%M-%S";

    /// Transcript file extension
    pub const FILE_EXTENSION: &str = "json";

    /// Default transcript root, relative to the user's home directory
    pub const DEFAULT_RELATIVE_ROOT: &str = ".openclaw/alfred-talk/transcripts";
}

/// HTTP constants
pub mod http {
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default listening port
    pub const DEFAULT_PORT: u16 = 8770;

    /// Response header carrying the per-request id
    pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
}
