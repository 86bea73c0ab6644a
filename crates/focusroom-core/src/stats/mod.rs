//! Statistics module for Focusroom
//!
//! Turns the session log into windowed reports: totals, category breakdown,
//! best weekday and hour, and the focus score.

mod format;
mod report;

pub use format::{format_minutes, render_text, Locale};
pub use report::{
    aggregate, focus_score, CategoryPercentage, CategoryTotal, FocusBand, Report,
    SessionAggregator, Window,
};
