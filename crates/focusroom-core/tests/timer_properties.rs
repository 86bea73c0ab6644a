//! Property tests for the session timer.
//!
//! This test file verifies:
//! - Target clamping for any minute value
//! - Completion after exactly `target` ticks
//! - Commit duration equals elapsed seconds
//! - Distraction counting from lifecycle edges

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use focusroom_core::{AppState, Event, ManualClock, MemoryStore, Phase, SessionStore, SessionTimer};

fn new_timer() -> (SessionTimer, ManualClock, MemoryStore) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let store = MemoryStore::new();
    let timer = SessionTimer::new(clock.clone(), store.clone());
    (timer, clock, store)
}

fn drive(timer: &mut SessionTimer, clock: &ManualClock, ticks: u64) -> Vec<Event> {
    (0..ticks)
        .filter_map(|_| {
            clock.advance_secs(1);
            timer.tick()
        })
        .collect()
}

proptest! {
    #[test]
    fn target_then_reset_yields_clamped_remaining(minutes in 0u32..10_000) {
        let (mut timer, _, _) = new_timer();
        timer.set_target_minutes(minutes);
        timer.reset();
        prop_assert_eq!(timer.remaining_secs(), (u64::from(minutes) * 60).max(60));
        prop_assert_eq!(timer.target_secs(), (u64::from(minutes) * 60).max(60));
    }

    #[test]
    fn countdown_completes_after_exactly_target_ticks(minutes in 1u32..5, away in 0u32..4) {
        let (mut timer, clock, store) = new_timer();
        timer.set_target_minutes(minutes);
        let target = timer.target_secs();
        timer.start();

        // Spread interruptions across the first part of the countdown.
        let mut ticked = 0;
        for _ in 0..away {
            prop_assert!(drive(&mut timer, &clock, 5).is_empty());
            ticked += 5;
            timer.handle_app_state(AppState::Inactive);
            timer.handle_app_state(AppState::Active);
            prop_assert_eq!(timer.phase(), Phase::Paused);
            timer.resume();
        }

        prop_assert!(drive(&mut timer, &clock, target - ticked - 1).is_empty());
        let events = drive(&mut timer, &clock, 1);
        prop_assert_eq!(events.len(), 1);

        let sessions = store.load_all().unwrap();
        prop_assert_eq!(sessions.len(), 1);
        prop_assert_eq!(sessions[0].duration_secs, target);
        prop_assert_eq!(sessions[0].distraction_count, away);
        prop_assert_eq!(timer.remaining_secs(), target);
        prop_assert_eq!(timer.distraction_count(), 0);
    }

    #[test]
    fn commit_credits_elapsed_seconds(elapsed in 0u64..1500) {
        let (mut timer, clock, store) = new_timer();
        timer.start();
        drive(&mut timer, &clock, elapsed);
        timer.pause(true);
        let remaining = timer.remaining_secs();
        timer.commit();

        let sessions = store.load_all().unwrap();
        if remaining == timer.target_secs() {
            prop_assert!(sessions.is_empty());
        } else {
            prop_assert_eq!(sessions.len(), 1);
            prop_assert_eq!(sessions[0].duration_secs, 1500 - remaining);
        }
        prop_assert_eq!(timer.phase(), Phase::Idle);
    }

    #[test]
    fn repeated_pauses_never_double_count(pauses in 1usize..10) {
        let (mut timer, clock, store) = new_timer();
        timer.start();
        drive(&mut timer, &clock, 3);
        for _ in 0..pauses {
            timer.pause(true);
            timer.pause(false);
        }
        prop_assert_eq!(timer.distraction_count(), 0);
        prop_assert_eq!(timer.remaining_secs(), 1497);
        prop_assert!(store.is_empty());
    }
}
