//! State management module
//!
//! This module contains the countdown state machine, start input resolution
//! and the application state that ties them to the outside world.

pub mod app_state;
pub mod start_input;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use start_input::resolve_total;
pub use timer_state::{BoundaryPolicy, TickOutcome, TimerPhase, TimerState};
