use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::constants::service;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Liveness probe. Has no dependencies and no side effects.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: service::NAME.to_string(),
    })
}
