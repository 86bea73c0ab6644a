//! Windowed focus reports.
//!
//! Everything here is a pure function of the session slice, the window and
//! `now`. Session timestamps are compared in `now`'s timezone, so passing a
//! `DateTime<Local>` gives local-calendar days and hours.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::format::Locale;
use crate::session::{Category, Session};

/// Time range used to filter sessions before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// Same calendar day as `now`.
    Daily,
    /// The last 7 days up to `now`, not aligned to calendar weeks.
    Weekly,
    /// Same calendar month as `now`.
    Monthly,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Daily => "daily",
            Window::Weekly => "weekly",
            Window::Monthly => "monthly",
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Window::Daily) => "Daily",
            (Locale::En, Window::Weekly) => "Weekly",
            (Locale::En, Window::Monthly) => "Monthly",
            (Locale::Tr, Window::Daily) => "Günlük",
            (Locale::Tr, Window::Weekly) => "Haftalık",
            (Locale::Tr, Window::Monthly) => "Aylık",
        }
    }

    /// Whether a session ending at `ts` falls inside this window.
    pub fn contains<Tz: TimeZone>(&self, ts: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        let local = ts.with_timezone(&now.timezone());
        match self {
            Window::Daily => {
                local.year() == now.year() && local.month() == now.month() && local.day() == now.day()
            }
            Window::Weekly => {
                let age = now.with_timezone(&Utc) - *ts;
                age >= Duration::zero() && age <= Duration::days(7)
            }
            Window::Monthly => local.year() == now.year() && local.month() == now.month(),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "günlük" => Ok(Window::Daily),
            "weekly" | "week" | "haftalık" => Ok(Window::Weekly),
            "monthly" | "month" | "aylık" => Ok(Window::Monthly),
            _ => Err(format!("unknown report window: {s}")),
        }
    }
}

/// Coarse reading of the focus score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusBand {
    High,
    Medium,
    Low,
}

impl FocusBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            FocusBand::High
        } else if score >= 40 {
            FocusBand::Medium
        } else {
            FocusBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPercentage {
    pub category: Category,
    pub percent: u64,
}

/// Aggregated view of the sessions inside one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub window: Window,
    pub session_count: usize,
    pub total_minutes: u64,
    pub total_distractions: u64,
    /// In order of first appearance among the filtered sessions.
    pub category_totals: Vec<CategoryTotal>,
    /// Empty when `total_minutes` is zero.
    pub category_percentages: Vec<CategoryPercentage>,
    /// 0 = Sunday .. 6 = Saturday.
    pub best_day: Option<u8>,
    /// 0 ..= 23.
    pub best_hour: Option<u8>,
    pub focus_score: u8,
}

impl Report {
    /// The report of a window with nothing in it.
    pub fn empty(window: Window) -> Self {
        Self {
            window,
            session_count: 0,
            total_minutes: 0,
            total_distractions: 0,
            category_totals: Vec::new(),
            category_percentages: Vec::new(),
            best_day: None,
            best_hour: None,
            focus_score: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.session_count == 0
    }

    pub fn category_total(&self, category: Category) -> Option<u64> {
        self.category_totals
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.minutes)
    }

    pub fn focus_band(&self) -> FocusBand {
        FocusBand::from_score(self.focus_score)
    }

    /// Weekday name of the best day, or `"-"`.
    pub fn best_day_label(&self, locale: Locale) -> String {
        match self.best_day {
            Some(day) => locale.day_name(day).to_string(),
            None => "-".to_string(),
        }
    }

    /// `"HH:00–HH:00"` for the best hour, or `"-"`.
    pub fn best_hour_label(&self) -> String {
        match self.best_hour {
            Some(h) => format!("{:02}:00–{:02}:00", h, h + 1),
            None => "-".to_string(),
        }
    }
}

/// Stateless report builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionAggregator;

impl SessionAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate<Tz: TimeZone>(
        &self,
        sessions: &[Session],
        window: Window,
        now: &DateTime<Tz>,
    ) -> Report {
        aggregate(sessions, window, now)
    }
}

/// Build the report for `window` as seen from `now`.
pub fn aggregate<Tz: TimeZone>(sessions: &[Session], window: Window, now: &DateTime<Tz>) -> Report {
    let tz = now.timezone();
    let filtered: Vec<&Session> = sessions
        .iter()
        .filter(|s| window.contains(&s.timestamp, now))
        .collect();

    if filtered.is_empty() {
        return Report::empty(window);
    }

    let mut total_minutes = 0u64;
    let mut total_distractions = 0u64;
    let mut category_totals: Vec<CategoryTotal> = Vec::new();
    let mut by_day = [0u64; 7];
    let mut by_hour = [0u64; 24];

    for session in &filtered {
        let minutes = session.minutes();
        total_minutes += minutes;
        total_distractions += u64::from(session.distraction_count);

        match category_totals.iter_mut().find(|t| t.category == session.category) {
            Some(total) => total.minutes += minutes,
            None => category_totals.push(CategoryTotal {
                category: session.category,
                minutes,
            }),
        }

        let local = session.timestamp.with_timezone(&tz);
        by_day[local.weekday().num_days_from_sunday() as usize] += minutes;
        by_hour[local.hour() as usize] += minutes;
    }

    let category_percentages = if total_minutes == 0 {
        Vec::new()
    } else {
        category_totals
            .iter()
            .map(|t| CategoryPercentage {
                category: t.category,
                percent: (t.minutes as f64 / total_minutes as f64 * 100.0).round() as u64,
            })
            .collect()
    };

    Report {
        window,
        session_count: filtered.len(),
        total_minutes,
        total_distractions,
        category_totals,
        category_percentages,
        best_day: best_index(&by_day),
        best_hour: best_index(&by_hour),
        focus_score: focus_score(total_minutes, total_distractions),
    }
}

/// `clamp(round(minutes / (distractions + 1) * 2), 0, 100)`, or 0 with no minutes.
pub fn focus_score(total_minutes: u64, total_distractions: u64) -> u8 {
    if total_minutes == 0 {
        return 0;
    }
    let raw = total_minutes as f64 / (total_distractions + 1) as f64 * 2.0;
    raw.round().clamp(0.0, 100.0) as u8
}

/// Index of the strictly greatest bucket; the earliest index wins ties.
/// `None` when every bucket is zero.
fn best_index(buckets: &[u64]) -> Option<u8> {
    let mut best: Option<(usize, u64)> = None;
    for (idx, &value) in buckets.iter().enumerate() {
        if value > best.map(|(_, v)| v).unwrap_or(0) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx as u8)
}
