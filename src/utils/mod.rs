//! Utility functions module
//!
//! This module contains label formatting and signal handling.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::format_mm_ss;
pub use signals::shutdown_signal;
