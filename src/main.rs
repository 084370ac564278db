//! Countdown Widget - A countdown timer with a live clock
//!
//! This is the main entry point for the countdown-widget application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_widget::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::clock_task,
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_widget={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-widget v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, boundary={:?}",
        config.host, config.port, config.tick_ms, config.boundary
    );

    // Create application state
    let state = Arc::new(AppState::new(&config));

    // Start the clock refresh background task
    let clock_state = Arc::clone(&state);
    tokio::spawn(async move {
        clock_task(clock_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start from {{\"minutes\", \"seconds\"}}");
    info!("  POST /pause          - Pause or resume");
    info!("  POST /reset          - Reset to 00:00");
    info!("  POST /add-minute     - Add one minute");
    info!("  POST /add-30-seconds - Add thirty seconds");
    info!("  POST /add            - Add {{\"seconds\"}}");
    info!("  GET  /status         - Timer and clock labels");
    info!("  GET  /health         - Health check");

    let server = axum::serve(listener, app);

    let signal = tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
            None
        }
        signal = shutdown_signal() => Some(signal),
    };

    state.shutdown_after(signal);
    info!("Server shutdown complete");
    Ok(())
}
