//! `POST /elevenlabs-webhook`
//!
//! Only an authentication failure changes the response status. Parse and
//! filesystem failures are logged and answered with 200 so the sender does
//! not retry a delivery that already reached us.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::app_state::AppState;
use crate::constants::webhook::SIGNATURE_HEADER;
use crate::error::{ApiError, Result};
use crate::middleware::RequestId;
use crate::services::{PersistError, PersistOutcome};
use crate::utils::verify_signature;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WebhookAck {
    pub status: String,
}

impl WebhookAck {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

pub async fn receive_webhook(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = state.webhook_secret() {
        if let Err(err) = authenticate(&headers, &body, secret) {
            return err.into_response_with_id(request_id.as_str());
        }
    }

    match state.transcript_store.persist(&body).await {
        Ok(PersistOutcome::Saved { path, .. }) => {
            debug!(path = %path.display(), "Webhook processed");
        }
        Ok(PersistOutcome::Ignored { .. }) => {}
        Err(e @ (PersistError::InvalidJson(_) | PersistError::NotAnObject)) => {
            error!(error = %e, "Webhook processing error: malformed payload");
        }
        Err(e) => {
            error!(error = %e, "Webhook processing error: failed to persist transcript");
        }
    }

    Json(WebhookAck::ok()).into_response()
}

/// Check the signature header against the raw body.
fn authenticate(headers: &HeaderMap, body: &[u8], secret: &str) -> Result<()> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingSignature(SIGNATURE_HEADER))?;

    if verify_signature(body, signature, secret) {
        Ok(())
    } else {
        Err(ApiError::InvalidSignature)
    }
}
