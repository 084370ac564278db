//! Background tasks module
//!
//! This module contains the countdown controller, whose ticks run as
//! background tasks, and the clock refresh task.

pub mod clock;
pub mod countdown;

// Re-export main items
pub use clock::clock_task;
pub use countdown::{CountdownController, SharedController, TimerSnapshot};
