use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Category, Session, SessionSummary};
use crate::timer::Phase;

/// Why the countdown stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseReason {
    /// The user asked for it.
    User,
    /// The host left the foreground.
    Interrupted,
}

/// Every state change of the timer produces an Event.
/// The host prints or renders them; nothing in the core consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        category: Category,
        target_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        reason: PauseReason,
        /// Whether the host should ask the user to resume, commit or discard.
        prompt: bool,
        distraction_count: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        target_secs: u64,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        session: Session,
        summary: SessionSummary,
        /// `true` when the countdown reached zero, `false` for a commit.
        finished_by_timer: bool,
        at: DateTime<Utc>,
    },
    /// A paused countdown was left alone; it can be picked up again with start.
    SessionDiscarded {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TargetChanged {
        target_secs: u64,
        remaining_secs: u64,
        /// Set while running: the new target applies on the next reset.
        pending: bool,
        at: DateTime<Utc>,
    },
    CategoryChanged {
        category: Category,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        category: Category,
        target_secs: u64,
        remaining_secs: u64,
        distraction_count: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn paused_event_carries_reason_prompt_and_count() {
        let event = Event::TimerPaused {
            remaining_secs: 1200,
            reason: PauseReason::Interrupted,
            prompt: false,
            distraction_count: 2,
            at: Utc.with_ymd_and_hms(2026, 3, 2, 9, 5, 0).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["remaining_secs"], 1200);
        assert_eq!(json["reason"], "interrupted");
        assert_eq!(json["prompt"], false);
        assert_eq!(json["distraction_count"], 2);
    }
}
