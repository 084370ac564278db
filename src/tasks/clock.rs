//! Live clock refresh task

use std::{sync::Arc, time::Duration};
use chrono::Local;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that refreshes the clock label once per second
pub async fn clock_task(state: Arc<AppState>) {
    info!("Starting clock task with format {:?}", state.clock_format);

    let mut interval = interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let now = Local::now().format(&state.clock_format).to_string();
        debug!("Clock: {}", now);
        state.clock_tx.send_replace(now);
    }
}
