//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for the first shutdown signal (SIGTERM, SIGINT) and return it
pub async fn shutdown_signal() -> anyhow::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    let signal = signals
        .next()
        .await
        .ok_or_else(|| anyhow::anyhow!("signal stream closed"))?;
    info!("Received signal: {}", signal);

    handle.close();
    Ok(signal)
}
