//! Countdown controller and its one-second tick
//!
//! The controller owns the timer state and the handle of the single pending
//! tick. A tick is a spawned task that sleeps for one interval and then calls
//! back into the controller; every operation that changes the run state
//! cancels the outstanding tick first, so at most one is ever in flight.

use std::{
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tokio::{task::AbortHandle, time::sleep};
use tracing::{debug, error, info, warn};

use crate::{
    error::InvalidInputError,
    services::DisplaySink,
    state::{resolve_total, BoundaryPolicy, TickOutcome, TimerPhase, TimerState},
    utils::format::{format_mm_ss, EXPIRED_TEXT, INVALID_TEXT},
};

pub type SharedController = Arc<Mutex<CountdownController>>;

/// Handle of the scheduled tick. The id guards against a tick that was
/// already waking up when it got cancelled.
#[derive(Debug)]
struct PendingTick {
    id: u64,
    handle: AbortHandle,
}

/// Point-in-time view of the countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_seconds: i64,
    pub is_running: bool,
    pub timer_text: String,
    pub pause_label: String,
}

pub struct CountdownController {
    state: TimerState,
    pending_tick: Option<PendingTick>,
    next_tick_id: u64,
    policy: BoundaryPolicy,
    tick_interval: Duration,
    timer_text: String,
    display: Arc<dyn DisplaySink>,
    this: Weak<Mutex<CountdownController>>,
}

impl CountdownController {
    /// Create a controller behind a shared lock. Ticks are spawned on the
    /// current tokio runtime, so operations must run inside one.
    pub fn new_shared(
        display: Arc<dyn DisplaySink>,
        policy: BoundaryPolicy,
        tick_interval: Duration,
    ) -> SharedController {
        Arc::new_cyclic(|this| {
            Mutex::new(Self {
                state: TimerState::new(),
                pending_tick: None,
                next_tick_id: 0,
                policy,
                tick_interval,
                timer_text: format_mm_ss(0),
                display,
                this: this.clone(),
            })
        })
    }

    /// Start counting down from the given fields, or from the accumulated
    /// time when both are empty
    pub fn start(&mut self, minutes: &str, seconds: &str) -> Result<TimerSnapshot, InvalidInputError> {
        self.cancel_pending_tick();

        let total = match resolve_total(minutes, seconds, self.state.remaining_seconds) {
            Ok(total) => total,
            Err(e) => {
                // The tick is gone, so the countdown must not look like it is running
                self.state.pause();
                warn!("Rejected countdown start: {}", e);
                self.show(INVALID_TEXT.to_string());
                return Err(e);
            }
        };

        info!("Starting countdown from {}s ({:?} boundary)", total, self.policy);
        self.state.arm(total);
        self.show(format_mm_ss(total));
        self.schedule_tick();
        Ok(self.snapshot())
    }

    /// Pause a running countdown, or resume a paused one that has time left.
    /// Idle time is only started by `start`.
    pub fn toggle_pause(&mut self) -> TimerSnapshot {
        if self.state.pause() {
            self.cancel_pending_tick();
            info!("Countdown paused with {}s left", self.state.remaining_seconds);
        } else if self.state.resume() {
            info!("Countdown resumed with {}s left", self.state.remaining_seconds);
            self.show(format_mm_ss(self.state.remaining_seconds));
            self.schedule_tick();
        } else {
            debug!("Pause toggled with nothing to resume");
        }
        self.snapshot()
    }

    /// Cancel the tick and clear the countdown back to idle
    pub fn reset(&mut self) -> TimerSnapshot {
        self.cancel_pending_tick();
        self.state.clear();
        info!("Countdown reset");
        self.show(format_mm_ss(0));
        self.snapshot()
    }

    /// Add (or with a negative delta, remove) time without starting the countdown
    pub fn add_time(&mut self, delta_seconds: i64) -> TimerSnapshot {
        let was_running = self.state.is_running();
        self.state.add_seconds(delta_seconds);
        if was_running && !self.state.is_running() {
            self.cancel_pending_tick();
        }

        info!(
            "Added {}s, {}s now on the clock",
            delta_seconds, self.state.remaining_seconds
        );
        self.show(format_mm_ss(self.state.remaining_seconds));
        self.snapshot()
    }

    /// Get the current state along with the label on display
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
            is_running: self.state.is_running(),
            timer_text: self.timer_text.clone(),
            pause_label: self.state.pause_label().to_string(),
        }
    }

    /// Get the underlying timer state
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Check if a tick is scheduled
    pub fn has_pending_tick(&self) -> bool {
        self.pending_tick.is_some()
    }

    fn tick(&mut self) {
        match self.state.advance(self.policy) {
            TickOutcome::Counting(remaining) => {
                self.show(format_mm_ss(remaining));
                self.schedule_tick();
            }
            TickOutcome::Expired => {
                self.pending_tick = None;
                info!("Countdown expired");
                self.show(EXPIRED_TEXT.to_string());
            }
            TickOutcome::Stopped => debug!("Tick ignored, countdown not running"),
        }
    }

    fn fire_tick(&mut self, id: u64) {
        if self.pending_tick.as_ref().map(|pending| pending.id) != Some(id) {
            debug!("Ignoring stale tick {}", id);
            return;
        }
        self.pending_tick = None;
        self.tick();
    }

    fn schedule_tick(&mut self) {
        self.cancel_pending_tick();
        self.next_tick_id += 1;

        let id = self.next_tick_id;
        let interval = self.tick_interval;
        let controller = self.this.clone();
        let task = tokio::spawn(async move {
            sleep(interval).await;
            let Some(controller) = controller.upgrade() else {
                return;
            };
            match controller.lock() {
                Ok(mut controller) => controller.fire_tick(id),
                Err(e) => error!("Failed to lock countdown controller for tick {}: {}", id, e),
            };
        });

        self.pending_tick = Some(PendingTick {
            id,
            handle: task.abort_handle(),
        });
    }

    fn cancel_pending_tick(&mut self) {
        if let Some(pending) = self.pending_tick.take() {
            debug!("Cancelling tick {}", pending.id);
            pending.handle.abort();
        }
    }

    fn show(&mut self, text: String) {
        self.display.set_timer_text(&text);
        self.timer_text = text;
    }
}

impl Drop for CountdownController {
    fn drop(&mut self) {
        self.cancel_pending_tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RecordingDisplay;

    fn controller(policy: BoundaryPolicy) -> (SharedController, Arc<RecordingDisplay>) {
        let display = Arc::new(RecordingDisplay::new());
        let controller = CountdownController::new_shared(display.clone(), policy, Duration::from_secs(1));
        (controller, display)
    }

    fn with<R>(controller: &SharedController, f: impl FnOnce(&mut CountdownController) -> R) -> R {
        f(&mut *controller.lock().unwrap())
    }

    async fn wait_millis(ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_sets_remaining_and_runs() {
        let (c, display) = controller(BoundaryPolicy::Strict);

        let snapshot = with(&c, |c| c.start("2", "30")).unwrap();
        assert_eq!(snapshot.remaining_seconds, 150);
        assert!(snapshot.is_running);
        assert_eq!(snapshot.phase, TimerPhase::Running);
        assert_eq!(snapshot.pause_label, "Pause");
        assert!(with(&c, |c| c.has_pending_tick()));
        assert_eq!(display.texts(), vec!["02:30"]);
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_to_times_up_then_accepts_more_time() {
        let (c, display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("2", "30")).unwrap();

        wait_millis(149_500).await;
        let snapshot = with(&c, |c| c.snapshot());
        assert_eq!(snapshot.remaining_seconds, 1);
        assert_eq!(snapshot.timer_text, "00:01");
        assert!(snapshot.is_running);

        wait_millis(1_000).await;
        let snapshot = with(&c, |c| c.snapshot());
        assert_eq!(snapshot.phase, TimerPhase::Expired);
        assert!(!snapshot.is_running);
        assert_eq!(display.last().as_deref(), Some("Time's up!"));
        assert!(!with(&c, |c| c.has_pending_tick()));
        // 02:30 down to 00:01, then the expiry message
        assert_eq!(display.texts().len(), 151);

        let snapshot = with(&c, |c| c.add_time(30));
        assert_eq!(snapshot.remaining_seconds, 30);
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.timer_text, "00:30");
    }

    #[tokio::test(start_paused = true)]
    async fn strict_boundary_expires_after_sixty_ticks() {
        let (c, _display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("1", "0")).unwrap();

        wait_millis(59_500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 1);

        wait_millis(1_000).await;
        let state = with(&c, |c| c.state().clone());
        assert_eq!(state.phase, TimerPhase::Expired);
        assert_eq!(state.remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn legacy_boundary_shows_zero_for_one_extra_tick() {
        let (c, display) = controller(BoundaryPolicy::Legacy);
        with(&c, |c| c.start("1", "0")).unwrap();

        wait_millis(60_500).await;
        let snapshot = with(&c, |c| c.snapshot());
        assert!(snapshot.is_running);
        assert_eq!(snapshot.remaining_seconds, 0);
        assert_eq!(snapshot.timer_text, "00:00");

        wait_millis(1_000).await;
        let state = with(&c, |c| c.state().clone());
        assert_eq!(state.phase, TimerPhase::Expired);
        assert_eq!(state.remaining_seconds, -1);
        assert_eq!(display.last().as_deref(), Some("Time's up!"));

        let snapshot = with(&c, |c| c.add_time(60));
        assert_eq!(snapshot.remaining_seconds, 60);
        assert!(!snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_start_reports_and_stays_stopped() {
        let (c, display) = controller(BoundaryPolicy::Strict);

        let err = with(&c, |c| c.start("0", "0")).unwrap_err();
        assert_eq!(err, InvalidInputError::NonPositive(0));
        let err = with(&c, |c| c.start("", "")).unwrap_err();
        assert_eq!(err, InvalidInputError::NothingToStart);

        assert!(!with(&c, |c| c.state().is_running()));
        assert!(!with(&c, |c| c.has_pending_tick()));
        assert_eq!(display.texts(), vec!["Invalid!", "Invalid!"]);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_start_while_running_cancels_the_tick() {
        let (c, _display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("0", "10")).unwrap();

        assert!(with(&c, |c| c.start("ten", "")).is_err());
        let snapshot = with(&c, |c| c.snapshot());
        assert_eq!(snapshot.phase, TimerPhase::Paused);
        assert_eq!(snapshot.remaining_seconds, 10);
        assert!(!with(&c, |c| c.has_pending_tick()));

        wait_millis(3_500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_and_resume_continues() {
        let (c, display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("0", "10")).unwrap();

        wait_millis(3_500).await;
        let snapshot = with(&c, |c| c.toggle_pause());
        assert_eq!(snapshot.remaining_seconds, 7);
        assert_eq!(snapshot.phase, TimerPhase::Paused);
        assert_eq!(snapshot.pause_label, "Resume");

        wait_millis(5_000).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 7);

        let snapshot = with(&c, |c| c.toggle_pause());
        assert!(snapshot.is_running);
        assert_eq!(snapshot.pause_label, "Pause");
        assert_eq!(display.last().as_deref(), Some("00:07"));

        wait_millis(1_500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pause_while_idle_is_a_no_op() {
        let (c, display) = controller(BoundaryPolicy::Strict);

        let snapshot = with(&c, |c| c.toggle_pause());
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert!(!snapshot.is_running);
        assert!(!with(&c, |c| c.has_pending_tick()));
        assert!(display.texts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pause_does_not_start_accumulated_time() {
        let (c, _display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.add_time(30));

        let snapshot = with(&c, |c| c.toggle_pause());
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert!(!snapshot.is_running);
        assert!(!with(&c, |c| c.has_pending_tick()));

        wait_millis(2_500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 30);

        let snapshot = with(&c, |c| c.start("", "")).unwrap();
        assert!(snapshot.is_running);
        wait_millis(2_500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 28);
    }

    #[tokio::test(start_paused = true)]
    async fn time_added_after_expiry_waits_for_start() {
        let (c, _display) = controller(BoundaryPolicy::Legacy);
        with(&c, |c| c.start("0", "1")).unwrap();

        wait_millis(2_500).await;
        assert_eq!(with(&c, |c| c.state().phase), TimerPhase::Expired);
        assert_eq!(with(&c, |c| c.state().remaining_seconds), -1);

        let snapshot = with(&c, |c| c.add_time(60));
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert!(!snapshot.is_running);

        let snapshot = with(&c, |c| c.toggle_pause());
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.remaining_seconds, 60);
        assert!(!with(&c, |c| c.has_pending_tick()));
    }

    #[tokio::test(start_paused = true)]
    async fn add_time_after_expiry_ignores_how_negative_it_was() {
        let (c, display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("0", "5")).unwrap();

        let snapshot = with(&c, |c| c.add_time(-8));
        assert_eq!(snapshot.remaining_seconds, -3);
        assert!(snapshot.is_running);

        wait_millis(1_500).await;
        let state = with(&c, |c| c.state().clone());
        assert_eq!(state.phase, TimerPhase::Expired);
        assert_eq!(state.remaining_seconds, -3);
        assert_eq!(display.last().as_deref(), Some("Time's up!"));

        let snapshot = with(&c, |c| c.add_time(60));
        assert_eq!(snapshot.remaining_seconds, 60);
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.timer_text, "01:00");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_twice_matches_reset_once() {
        let (c, display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("5", "0")).unwrap();
        wait_millis(2_500).await;

        let once = with(&c, |c| c.reset());
        let twice = with(&c, |c| c.reset());
        assert_eq!(once, twice);
        assert_eq!(twice.remaining_seconds, 0);
        assert!(!twice.is_running);
        assert!(!with(&c, |c| c.has_pending_tick()));

        wait_millis(5_000).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 0);
        assert_eq!(display.last().as_deref(), Some("00:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_never_double_schedules() {
        let (c, display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("0", "10")).unwrap();

        wait_millis(500).await;
        with(&c, |c| c.start("0", "10")).unwrap();

        // The first start's tick would have landed here
        wait_millis(700).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 10);

        wait_millis(500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 9);
        assert_eq!(display.texts(), vec!["00:10", "00:10", "00:09"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_is_ignored() {
        let (c, _display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("0", "10")).unwrap();

        with(&c, |c| c.fire_tick(999));
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 10);
        assert!(with(&c, |c| c.has_pending_tick()));
    }

    #[tokio::test(start_paused = true)]
    async fn add_time_while_running_keeps_counting() {
        let (c, _display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.start("0", "10")).unwrap();

        let snapshot = with(&c, |c| c.add_time(60));
        assert_eq!(snapshot.remaining_seconds, 70);
        assert_eq!(snapshot.timer_text, "01:10");
        assert!(snapshot.is_running);
        assert!(with(&c, |c| c.has_pending_tick()));

        wait_millis(1_500).await;
        assert_eq!(with(&c, |c| c.state().remaining_seconds), 69);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fields_start_from_accumulated_time() {
        let (c, _display) = controller(BoundaryPolicy::Strict);
        with(&c, |c| c.add_time(60));
        let snapshot = with(&c, |c| c.add_time(30));
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert_eq!(snapshot.timer_text, "01:30");

        let snapshot = with(&c, |c| c.start("", "")).unwrap();
        assert_eq!(snapshot.remaining_seconds, 90);
        assert!(snapshot.is_running);
    }
}
