// Data models for inbound webhook payloads

pub mod webhook;

pub use webhook::{sanitize_file_component, WebhookEvent};
