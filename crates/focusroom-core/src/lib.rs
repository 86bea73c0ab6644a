//! # Focusroom Core Library
//!
//! This library provides the core logic for the Focusroom focus tracker: a
//! countdown timer bound to a work category, a persisted session log, and
//! windowed focus reports computed from that log. The CLI is a thin host over
//! the same library.
//!
//! ## Architecture
//!
//! - **Session Timer**: An integer-second countdown state machine. The host
//!   delivers ticks and foreground/background edges; the timer emits events
//!   and appends finished sessions to a session store.
//! - **Storage**: SQLite-based session log and TOML-based configuration.
//! - **Stats**: Pure aggregation of sessions into daily, weekly and monthly
//!   reports.
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`SessionStore`]: Append/load contract for the session log
//! - [`Database`]: SQLite session log
//! - [`aggregate`]: Report builder
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::{Event, PauseReason};
pub use session::{Category, Session, SessionSummary};
pub use stats::{aggregate, FocusBand, Locale, Report, SessionAggregator, Window};
pub use storage::{Config, Database, MemoryStore, SessionStore};
pub use timer::{
    AppState, CancelToken, Clock, ManualClock, Phase, SessionTimer, SystemClock, TimerState,
};
