//! Countdown state machine, free of any scheduling concerns

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Where the countdown currently sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Expired,
}

/// How a running countdown treats reaching zero.
///
/// `Strict` expires on the tick that brings the counter to zero. `Legacy`
/// shows `00:00` for one more tick and expires with the counter at -1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    #[default]
    Strict,
    Legacy,
}

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; carries the value to display
    Counting(i64),
    /// The countdown just ran out
    Expired,
    /// Not running, nothing happened
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_seconds: i64,
    pub phase: TimerPhase,
}

impl TimerState {
    /// Create an idle timer state with no time on the clock
    pub fn new() -> Self {
        Self {
            remaining_seconds: 0,
            phase: TimerPhase::Idle,
        }
    }

    /// Check if the countdown is running
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Begin counting down from `total` seconds
    pub fn arm(&mut self, total: i64) {
        self.remaining_seconds = total;
        self.phase = TimerPhase::Running;
    }

    /// Stop counting while keeping the remaining time.
    /// Returns false if the countdown was not running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = TimerPhase::Paused;
        true
    }

    /// Whether a paused countdown has time left to resume. Idle time has to
    /// be started explicitly.
    pub fn can_resume(&self) -> bool {
        self.phase == TimerPhase::Paused && self.remaining_seconds > 0
    }

    /// Continue a paused countdown
    pub fn resume(&mut self) -> bool {
        if !self.can_resume() {
            return false;
        }
        self.phase = TimerPhase::Running;
        true
    }

    /// Drop all time and go back to idle
    pub fn clear(&mut self) {
        self.remaining_seconds = 0;
        self.phase = TimerPhase::Idle;
    }

    /// Add `delta` seconds. A negative counter is replaced outright and the
    /// countdown is forced to stop; otherwise the delta is added and a running
    /// countdown keeps running.
    pub fn add_seconds(&mut self, delta: i64) {
        if self.remaining_seconds < 0 {
            self.remaining_seconds = delta;
            if self.phase != TimerPhase::Paused {
                self.phase = TimerPhase::Idle;
            }
            return;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_add(delta);
        if self.phase == TimerPhase::Expired {
            self.phase = TimerPhase::Idle;
        }
    }

    /// Advance one tick under the given boundary policy
    pub fn advance(&mut self, policy: BoundaryPolicy) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Stopped;
        }

        match policy {
            BoundaryPolicy::Strict => {
                if self.remaining_seconds > 0 {
                    self.remaining_seconds -= 1;
                }
                if self.remaining_seconds > 0 {
                    return TickOutcome::Counting(self.remaining_seconds);
                }
            }
            BoundaryPolicy::Legacy => {
                if self.remaining_seconds > 0 {
                    self.remaining_seconds -= 1;
                    return TickOutcome::Counting(self.remaining_seconds);
                }
                self.remaining_seconds = self.remaining_seconds.min(-1);
            }
        }

        self.phase = TimerPhase::Expired;
        TickOutcome::Expired
    }

    /// Label for the pause/resume button
    pub fn pause_label(&self) -> &'static str {
        if self.phase == TimerPhase::Paused {
            "Resume"
        } else {
            "Pause"
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
