mod clock;
mod engine;
mod lifecycle;

pub use clock::{CancelToken, Clock, ManualClock, SystemClock};
pub use engine::{
    recompute_remaining, target_secs_for_minutes, Phase, SessionTimer, TimerState,
    DEFAULT_TARGET_SECS, MIN_TARGET_SECS,
};
pub use lifecycle::{AppState, LifecycleEdge, LifecycleWatch};
