//! Time source and once-per-second tick scheduling.
//!
//! The timer never sleeps or spawns anything itself. It asks its [`Clock`] for a
//! [`CancelToken`] when it starts counting, and the host delivers ticks by
//! calling [`SessionTimer::tick`](super::SessionTimer::tick) roughly once per
//! second. Ticks that arrive while the timer holds no live token are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Handle to one scheduled once-per-second tick stream.
///
/// Clones share the same flag. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct CancelToken {
    active: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of "now" and of tick schedules.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;

    /// Begin a once-per-second schedule. The returned token stays live until
    /// cancelled.
    fn schedule_every_second(&self) -> CancelToken;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule_every_second(&self) -> CancelToken {
        CancelToken::new()
    }
}

#[derive(Debug)]
struct ManualInner {
    now: DateTime<Utc>,
    schedules: Vec<CancelToken>,
}

/// Deterministic clock for tests and simulations.
///
/// Time only moves when told to, and every schedule it hands out is kept so
/// callers can check that nothing was left running.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                now: start,
                schedules: Vec::new(),
            })),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut inner = self.lock();
        inner.now += Duration::seconds(secs);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.lock().now = now;
    }

    /// Number of schedules handed out so far.
    pub fn schedules_created(&self) -> usize {
        self.lock().schedules.len()
    }

    /// Number of schedules that were never cancelled.
    pub fn active_schedules(&self) -> usize {
        self.lock()
            .schedules
            .iter()
            .filter(|t| t.is_active())
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        // A poisoned lock only means a test thread panicked mid-update; the
        // data is still a plain timestamp and a list of flags.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    fn schedule_every_second(&self) -> CancelToken {
        let token = CancelToken::new();
        self.lock().schedules.push(token.clone());
        token
    }
}
