// Utility functions
// Signature verification for inbound webhooks.

pub mod signature;

pub use signature::{compute_signature, verify_signature, SignatureHeader};
