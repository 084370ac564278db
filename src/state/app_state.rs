//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info};

use crate::{
    config::Config,
    error::AppError,
    services::WatchDisplay,
    tasks::countdown::{CountdownController, SharedController, TimerSnapshot},
    utils::format::format_mm_ss,
};

/// Composition root: owns the countdown controller and the labels it drives
pub struct AppState {
    pub controller: SharedController,
    /// Latest timer label, as published by the display sink
    pub timer_text_rx: watch::Receiver<String>,
    /// Latest clock label, refreshed by the clock task
    pub clock_tx: watch::Sender<String>,
    pub clock_format: String,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Build the application state from the parsed configuration
    pub fn new(config: &Config) -> Self {
        let (display, timer_text_rx) = WatchDisplay::new(&format_mm_ss(0));
        let controller = CountdownController::new_shared(
            Arc::new(display),
            config.boundary,
            config.tick_interval(),
        );
        let (clock_tx, _) = watch::channel(String::new());

        Self {
            controller,
            timer_text_rx,
            clock_tx,
            clock_format: config.clock_format.clone(),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run an operation against the controller and record it as the last action
    fn apply<R, F>(&self, action: &str, op: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut CountdownController) -> R,
    {
        let mut controller = self.controller.lock()
            .map_err(|_| AppError::Poisoned("countdown controller"))?;
        let result = op(&mut *controller);
        drop(controller);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    /// Start the countdown from the raw minute/second fields
    pub fn start(&self, minutes: &str, seconds: &str) -> Result<TimerSnapshot, AppError> {
        let snapshot = self.apply("start", |c| c.start(minutes, seconds))??;
        Ok(snapshot)
    }

    /// Pause or resume the countdown
    pub fn toggle_pause(&self) -> Result<TimerSnapshot, AppError> {
        self.apply("pause", |c| c.toggle_pause())
    }

    /// Reset the countdown to idle
    pub fn reset(&self) -> Result<TimerSnapshot, AppError> {
        self.apply("reset", |c| c.reset())
    }

    /// Add seconds to the countdown without starting it
    pub fn add_time(&self, delta_seconds: i64) -> Result<TimerSnapshot, AppError> {
        self.apply(&format!("add {}s", delta_seconds), |c| c.add_time(delta_seconds))
    }

    /// Get current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, AppError> {
        self.controller.lock()
            .map(|c| c.snapshot())
            .map_err(|_| AppError::Poisoned("countdown controller"))
    }

    /// Get the timer label currently on display
    pub fn timer_text(&self) -> String {
        self.timer_text_rx.borrow().clone()
    }

    /// Get the latest clock label
    pub fn clock_text(&self) -> String {
        self.clock_tx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Log how the server came to stop, then stop the countdown. A failed
    /// signal handler still stops it.
    pub fn shutdown_after(&self, signal: Option<anyhow::Result<i32>>) {
        match signal {
            Some(Ok(signal)) => info!("Shutdown signal {} received", signal),
            Some(Err(e)) => error!("Signal handling failed, shutting down: {}", e),
            None => info!("Server stopped on its own"),
        }
        self.shutdown();
    }

    /// Stop the countdown so no tick outlives the server
    pub fn shutdown(&self) {
        match self.controller.lock() {
            Ok(mut controller) => {
                controller.reset();
                info!("Countdown stopped for shutdown");
            }
            Err(e) => error!("Failed to lock countdown controller on shutdown: {}", e),
        };
    }
}
