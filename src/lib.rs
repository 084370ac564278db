//! Countdown Widget - A countdown timer with a live clock
//!
//! This library provides the countdown state machine, its cancellable
//! one-second tick, and the HTTP surface that stands in for the timer's
//! buttons and labels.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, InvalidInputError};
pub use state::AppState;
pub use api::create_router;
pub use tasks::{CountdownController, TimerSnapshot};
pub use utils::signals::shutdown_signal;
