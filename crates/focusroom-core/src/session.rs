//! Session records and work categories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Work category a session is bound to.
///
/// The core treats it as an opaque key. Colors and icons belong to whoever
/// renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Coding,
    Lesson,
    Project,
    Book,
    Reading,
    Research,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Coding,
        Category::Lesson,
        Category::Project,
        Category::Book,
        Category::Reading,
        Category::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Coding => "coding",
            Category::Lesson => "lesson",
            Category::Project => "project",
            Category::Book => "book",
            Category::Reading => "reading",
            Category::Research => "research",
        }
    }

    /// Turkish label, accepted as an alias when parsing.
    pub fn label_tr(&self) -> &'static str {
        match self {
            Category::Coding => "kodlama",
            Category::Lesson => "ders",
            Category::Project => "proje",
            Category::Book => "kitap",
            Category::Reading => "okuma",
            Category::Research => "araştırma",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Coding
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle || c.label_tr() == needle)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// One completed or committed block of focus time. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// When the session ended.
    pub timestamp: DateTime<Utc>,
    pub duration_secs: u64,
    pub category: Category,
    pub distraction_count: u32,
}

impl Session {
    /// Build a session. Returns `None` when `duration_secs` is zero, so a
    /// session with no credited time can never reach a store.
    pub fn new(
        timestamp: DateTime<Utc>,
        duration_secs: u64,
        category: Category,
        distraction_count: u32,
    ) -> Option<Self> {
        if duration_secs == 0 {
            return None;
        }
        Some(Self {
            timestamp,
            duration_secs,
            category,
            distraction_count,
        })
    }

    /// Credited minutes, rounded half away from zero.
    ///
    /// Reports sum these per session (round-then-sum).
    pub fn minutes(&self) -> u64 {
        (self.duration_secs as f64 / 60.0).round() as u64
    }

    /// Whole minutes, truncated. Used for the end-of-session summary.
    pub fn whole_minutes(&self) -> u64 {
        self.duration_secs / 60
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            category: self.category,
            minutes: self.whole_minutes(),
            distractions: self.distraction_count,
        }
    }
}

/// What the user is shown right after a session is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub category: Category,
    pub minutes: u64,
    pub distractions: u32,
}
