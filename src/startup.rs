//! Application startup and initialization logic.

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat};
use crate::services::TranscriptStore;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the configured `LOG_LEVEL` applies
/// to this crate and to tower_http.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "alfred_talk_webhook={level},tower_http={level}",
            level = config.log_level
        )
        .into()
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Prepare the transcript root and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    let transcript_store = TranscriptStore::new(config.transcript_dir.clone());
    transcript_store.ensure_root().await?;
    info!(
        transcript_dir = %transcript_store.root().display(),
        "Transcript directory ready"
    );

    if config.signature_verification_enabled() {
        info!("Webhook signature verification enabled");
    } else {
        warn!("ELEVENLABS_WEBHOOK_SECRET is not set; accepting unsigned webhooks");
    }

    Ok(AppState::new(config.clone(), transcript_store))
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
