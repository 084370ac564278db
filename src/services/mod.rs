//! External collaborators module
//!
//! This module contains the display sinks the countdown writes its label to.

pub mod display;

// Re-export main types
pub use display::{DisplaySink, WatchDisplay};
#[cfg(test)]
pub use display::RecordingDisplay;
