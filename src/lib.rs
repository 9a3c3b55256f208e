//! ElevenLabs post-call transcription webhook receiver.
//!
//! Verifies the `elevenlabs-signature` HMAC when a secret is configured and
//! writes `post_call_transcription` payloads to a date-partitioned directory
//! tree. Reading those files is left to other processes.

pub mod app_state;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod startup;
pub mod utils;

pub use app_state::AppState;
pub use config::Config;
pub use error::ApiError;
pub use router::build_router;
