//! HMAC-SHA256 verification of `elevenlabs-signature` headers.
//!
//! The header has the shape `t=<timestamp>,v1=<hex-digest>` and the signed
//! message is `"<timestamp>.<raw body>"`. The timestamp is not checked
//! against the current time, so a captured request can be replayed for as
//! long as the secret stays valid.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Timestamp and digest parsed from a signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    pub timestamp: &'a str,
    pub signature: &'a str,
}

impl<'a> SignatureHeader<'a> {
    /// Parse `t=<timestamp>,v1=<hex>`.
    ///
    /// Segments are positional: the first carries the timestamp, the second the
    /// digest. Keys are not checked and each segment is split on its first `=`
    /// only. Extra segments are ignored.
    pub fn parse(header: &'a str) -> Option<Self> {
        let mut segments = header.split(',');
        let (_, timestamp) = segments.next()?.split_once('=')?;
        let (_, signature) = segments.next()?.split_once('=')?;
        Some(Self {
            timestamp,
            signature,
        })
    }
}

/// Compute the lowercase hex HMAC-SHA256 of `"<timestamp>.<payload>"`.
pub fn compute_signature(timestamp: &str, payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a raw request body against its signature header.
///
/// Returns `false` for any malformed header, a non UTF-8 body or a digest
/// mismatch. The digest comparison runs in constant time.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str) -> bool {
    let Some(parsed) = SignatureHeader::parse(header) else {
        warn!("Signature parse error: expected `t=<timestamp>,v1=<signature>`");
        return false;
    };

    let Ok(body) = std::str::from_utf8(payload) else {
        warn!("Signature parse error: payload is not valid UTF-8");
        return false;
    };

    let expected = compute_signature(parsed.timestamp, body, secret);
    let matches = constant_time_eq(expected.as_bytes(), parsed.signature.as_bytes());
    if !matches {
        debug!(timestamp = %parsed.timestamp, "Webhook signature mismatch");
    }
    matches
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    // Length is public: the expected digest is always 64 hex chars
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
