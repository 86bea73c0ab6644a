//! Session timer implementation.
//!
//! The timer is a countdown state machine with integer-second granularity. It
//! has no thread of its own: when it starts counting it takes a
//! [`CancelToken`] from its [`Clock`], and the host calls `tick()` once per
//! second while that token is live.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Finished) -> Idle
//!           |  ^
//!           v  |
//!          Paused -> Idle (commit | discard | reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new(SystemClock, Database::open()?);
//! timer.start();
//! // Once per second:
//! if let Some(Event::SessionRecorded { .. }) = timer.tick() { /* done */ }
//! ```
//!
//! Every transition returns `Option<Event>`; `None` means the call was a no-op
//! in the current phase.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{CancelToken, Clock};
use super::lifecycle::{AppState, LifecycleEdge, LifecycleWatch};
use crate::events::{Event, PauseReason};
use crate::session::{Category, Session};
use crate::storage::SessionStore;

/// Shortest allowed target, in seconds.
pub const MIN_TARGET_SECS: u64 = 60;
/// Target used when nothing else is configured (25 minutes).
pub const DEFAULT_TARGET_SECS: u64 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero. Only held while the session is being recorded.
    Finished,
}

/// The single piece of mutable timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub target_secs: u64,
    pub remaining_secs: u64,
    pub category: Category,
    pub distraction_count: u32,
    /// Target requested while running; applied at the next recompute.
    #[serde(default)]
    pub pending_target_secs: Option<u64>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            target_secs: DEFAULT_TARGET_SECS,
            remaining_secs: DEFAULT_TARGET_SECS,
            category: Category::default(),
            distraction_count: 0,
            pending_target_secs: None,
        }
    }
}

/// Clamp a target given in minutes to the one-minute floor.
pub fn target_secs_for_minutes(minutes: u32) -> u64 {
    (u64::from(minutes) * 60).max(MIN_TARGET_SECS)
}

/// Refill the countdown from the target, applying any pending target first.
pub fn recompute_remaining(mut state: TimerState) -> TimerState {
    if let Some(target) = state.pending_target_secs.take() {
        state.target_secs = target;
    }
    state.remaining_secs = state.target_secs;
    state
}

/// Focus session timer.
///
/// Owns the [`TimerState`], its tick schedule and its lifecycle subscription.
/// Finished sessions are appended to the session store; a failing store is
/// logged and otherwise ignored.
pub struct SessionTimer {
    state: TimerState,
    clock: Box<dyn Clock>,
    store: Box<dyn SessionStore>,
    ticker: Option<CancelToken>,
    lifecycle: Option<LifecycleWatch>,
    /// Last host state seen by a watch, kept across detach.
    app_state: AppState,
}

impl SessionTimer {
    /// Create an idle timer with the default 25-minute target, already
    /// attached to lifecycle events.
    pub fn new(clock: impl Clock + 'static, store: impl SessionStore + 'static) -> Self {
        Self::with_state(TimerState::default(), clock, store)
    }

    /// Create a timer from an initial state. The phase is forced to `Idle`
    /// and the countdown is refilled from the target.
    pub fn with_state(
        state: TimerState,
        clock: impl Clock + 'static,
        store: impl SessionStore + 'static,
    ) -> Self {
        let mut state = recompute_remaining(TimerState {
            phase: Phase::Idle,
            distraction_count: 0,
            ..state
        });
        state.target_secs = state.target_secs.max(MIN_TARGET_SECS);
        state.remaining_secs = state.target_secs;
        let mut timer = Self {
            state,
            clock: Box::new(clock),
            store: Box::new(store),
            ticker: None,
            lifecycle: None,
            app_state: AppState::Active,
        };
        timer.attach();
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn target_secs(&self) -> u64 {
        self.state.target_secs
    }

    pub fn category(&self) -> Category {
        self.state.category
    }

    pub fn distraction_count(&self) -> u32 {
        self.state.distraction_count
    }

    /// Whether a live tick schedule is held.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(CancelToken::is_active)
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle.is_some()
    }

    /// 0.0 .. 1.0 progress through the current target.
    pub fn progress(&self) -> f64 {
        if self.state.target_secs == 0 {
            return 0.0;
        }
        1.0 - (self.state.remaining_secs as f64 / self.state.target_secs as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            category: self.state.category,
            target_secs: self.state.target_secs,
            remaining_secs: self.state.remaining_secs,
            distraction_count: self.state.distraction_count,
            progress: self.progress(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Idle {
            debug!(phase = ?self.state.phase, "start ignored");
            return None;
        }
        if self.state.remaining_secs == 0 {
            self.state = recompute_remaining(self.state.clone());
        }
        self.state.distraction_count = 0;
        self.state.phase = Phase::Running;
        self.schedule_ticks();
        Some(Event::TimerStarted {
            category: self.state.category,
            target_secs: self.state.target_secs,
            remaining_secs: self.state.remaining_secs,
            at: self.clock.now(),
        })
    }

    /// Stop counting. A user-initiated pause asks the host for a prompt.
    pub fn pause(&mut self, user_initiated: bool) -> Option<Event> {
        if self.state.phase != Phase::Running {
            debug!(phase = ?self.state.phase, "pause ignored");
            return None;
        }
        self.cancel_ticks();
        self.state.phase = Phase::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.state.remaining_secs,
            reason: PauseReason::User,
            prompt: user_initiated,
            distraction_count: self.state.distraction_count,
            at: self.clock.now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Paused {
            debug!(phase = ?self.state.phase, "resume ignored");
            return None;
        }
        self.state.phase = Phase::Running;
        self.schedule_ticks();
        Some(Event::TimerResumed {
            remaining_secs: self.state.remaining_secs,
            at: self.clock.now(),
        })
    }

    /// Save the elapsed part of a paused session and go back to idle.
    ///
    /// Nothing is recorded if no time has elapsed; the timer still resets.
    pub fn commit(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Paused {
            debug!(phase = ?self.state.phase, "commit ignored");
            return None;
        }
        let spent = self.state.target_secs.saturating_sub(self.state.remaining_secs);
        let session = Session::new(
            self.clock.now(),
            spent,
            self.state.category,
            self.state.distraction_count,
        );
        self.return_to_idle();
        match session {
            Some(session) => Some(self.record(session, false)),
            None => {
                debug!("commit with no elapsed time, nothing recorded");
                Some(Event::TimerReset {
                    target_secs: self.state.target_secs,
                    at: self.clock.now(),
                })
            }
        }
    }

    /// Drop out of a paused session without recording it. The remaining time
    /// is kept, so a later `start()` picks up where it stopped.
    pub fn discard(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Paused {
            debug!(phase = ?self.state.phase, "discard ignored");
            return None;
        }
        self.state.phase = Phase::Idle;
        Some(Event::SessionDiscarded {
            remaining_secs: self.state.remaining_secs,
            at: self.clock.now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.return_to_idle();
        Some(Event::TimerReset {
            target_secs: self.state.target_secs,
            at: self.clock.now(),
        })
    }

    /// One second elapsed. Returns `Some(Event::SessionRecorded)` when the
    /// countdown completes.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Running || !self.is_ticking() {
            return None;
        }
        if self.state.remaining_secs > 1 {
            self.state.remaining_secs -= 1;
            return None;
        }

        self.cancel_ticks();
        self.state.remaining_secs = 0;
        self.state.phase = Phase::Finished;
        // Completion credits the whole target, not measured wall time.
        let session = Session::new(
            self.clock.now(),
            self.state.target_secs,
            self.state.category,
            self.state.distraction_count,
        );
        self.return_to_idle();
        session.map(|s| self.record(s, true))
    }

    /// Change the target. Values under one minute are clamped.
    ///
    /// While running, the new target waits for the next reset or completion.
    pub fn set_target_minutes(&mut self, minutes: u32) -> Option<Event> {
        let target = target_secs_for_minutes(minutes);
        if u64::from(minutes) * 60 < MIN_TARGET_SECS {
            debug!(minutes, "target below one minute, clamped");
        }
        let pending = self.state.phase == Phase::Running;
        self.state.pending_target_secs = Some(target);
        if !pending {
            self.state = recompute_remaining(self.state.clone());
        }
        Some(Event::TargetChanged {
            target_secs: target,
            remaining_secs: self.state.remaining_secs,
            pending,
            at: self.clock.now(),
        })
    }

    /// Pick the category for the next session. Refused once a session has
    /// started and until it is committed, discarded or reset.
    pub fn select_category(&mut self, category: Category) -> Option<Event> {
        if self.state.phase != Phase::Idle {
            debug!(phase = ?self.state.phase, "category change refused during a session");
            return None;
        }
        self.state.category = category;
        Some(Event::CategoryChanged {
            category,
            at: self.clock.now(),
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Subscribe to lifecycle events, starting from the last state observed
    /// before any earlier detach. Returns `false` if already attached.
    pub fn attach(&mut self) -> bool {
        self.attach_in(self.app_state)
    }

    /// Subscribe to lifecycle events with the host's current state.
    /// Returns `false` if already attached.
    pub fn attach_in(&mut self, current: AppState) -> bool {
        if self.lifecycle.is_some() {
            return false;
        }
        self.app_state = current;
        self.lifecycle = Some(LifecycleWatch::starting_at(current));
        true
    }

    /// Unsubscribe from lifecycle events. Returns `false` if not attached.
    pub fn detach(&mut self) -> bool {
        match self.lifecycle.take() {
            Some(watch) => {
                self.app_state = watch.last();
                true
            }
            None => false,
        }
    }

    /// Feed the host's foreground state. Leaving the foreground while running
    /// counts one distraction and pauses silently; coming back never resumes.
    pub fn handle_app_state(&mut self, next: AppState) -> Option<Event> {
        let edge = self.lifecycle.as_mut()?.observe(next);
        if edge != LifecycleEdge::WentAway || self.state.phase != Phase::Running {
            return None;
        }
        self.state.distraction_count += 1;
        self.cancel_ticks();
        self.state.phase = Phase::Paused;
        info!(
            distractions = self.state.distraction_count,
            remaining_secs = self.state.remaining_secs,
            "app left foreground, timer paused"
        );
        Some(Event::TimerPaused {
            remaining_secs: self.state.remaining_secs,
            reason: PauseReason::Interrupted,
            prompt: false,
            distraction_count: self.state.distraction_count,
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn schedule_ticks(&mut self) {
        self.cancel_ticks();
        self.ticker = Some(self.clock.schedule_every_second());
    }

    fn cancel_ticks(&mut self) {
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }

    fn return_to_idle(&mut self) {
        self.cancel_ticks();
        self.state = recompute_remaining(self.state.clone());
        self.state.distraction_count = 0;
        self.state.phase = Phase::Idle;
    }

    fn record(&mut self, session: Session, finished_by_timer: bool) -> Event {
        match self.store.append(&session) {
            Ok(()) => info!(
                category = %session.category,
                duration_secs = session.duration_secs,
                distractions = session.distraction_count,
                "session recorded"
            ),
            Err(e) => warn!(error = %e, "failed to persist session, continuing in memory"),
        }
        Event::SessionRecorded {
            summary: session.summary(),
            at: session.timestamp,
            session,
            finished_by_timer,
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.cancel_ticks();
        self.detach();
    }
}
