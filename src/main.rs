use anyhow::Result;
use tracing::info;

use alfred_talk_webhook::config::Config;
use alfred_talk_webhook::router::build_router;
use alfred_talk_webhook::startup::{init_tracing, initialize_app, shutdown_signal};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (reads .env first)
    let config = Config::from_env()?;

    init_tracing(&config);

    let app_state = initialize_app(&config).await?;
    let app = build_router(app_state);

    let addr = config.socket_addr();
    info!("Starting alfred-talk webhook receiver on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
