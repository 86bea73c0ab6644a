//! Human-readable rendering of reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::report::{FocusBand, Report};

/// Display language for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

const DAY_NAMES_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const DAY_NAMES_TR: [&str; 7] = [
    "Pazar",
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
];

impl Locale {
    /// Weekday name, 0 = Sunday.
    pub fn day_name(&self, day: u8) -> &'static str {
        let names = match self {
            Locale::En => &DAY_NAMES_EN,
            Locale::Tr => &DAY_NAMES_TR,
        };
        names.get(day as usize).copied().unwrap_or("?")
    }

    fn units(&self) -> (&'static str, &'static str) {
        match self {
            Locale::En => ("h", "min"),
            Locale::Tr => ("saat", "dk"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Tr => f.write_str("tr"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "tr" => Ok(Locale::Tr),
            _ => Err(format!("unknown locale: {s}")),
        }
    }
}

/// `"0 min"`, `"25 min"`, `"2 h"`, `"1 h 5 min"` (or the Turkish units).
pub fn format_minutes(minutes: u64, locale: Locale) -> String {
    let (hour_unit, min_unit) = locale.units();
    if minutes == 0 {
        return format!("0 {min_unit}");
    }
    let h = minutes / 60;
    let m = minutes % 60;
    match (h, m) {
        (0, m) => format!("{m} {min_unit}"),
        (h, 0) => format!("{h} {hour_unit}"),
        (h, m) => format!("{h} {hour_unit} {m} {min_unit}"),
    }
}

/// Render a report as a plain-text card.
pub fn render_text(report: &Report, locale: Locale) -> String {
    let mut output = String::new();
    let title = match locale {
        Locale::En => "Focus Report",
        Locale::Tr => "Odak Raporu",
    };
    output.push_str(&format!("{} ({})\n", title, report.window.label(locale)));
    output.push_str(&"=".repeat(40));
    output.push('\n');

    let labels = match locale {
        Locale::En => ["Best day", "Total time", "Busiest hour", "Distractions", "Focus score"],
        Locale::Tr => [
            "En verimli gün",
            "Toplam süre",
            "En yoğun saat",
            "Dikkat dağınıklığı",
            "Odak kalitesi",
        ],
    };

    output.push_str(&format!("{:<20}{}\n", labels[0], report.best_day_label(locale)));
    output.push_str(&format!(
        "{:<20}{}\n",
        labels[1],
        format_minutes(report.total_minutes, locale)
    ));
    output.push_str(&format!("{:<20}{}\n", labels[2], report.best_hour_label()));
    output.push_str(&format!("{:<20}{}\n", labels[3], report.total_distractions));
    output.push_str(&format!(
        "{:<20}{} / 100 {}\n",
        labels[4],
        report.focus_score,
        focus_bar(report.focus_score, report.focus_band())
    ));

    if !report.category_totals.is_empty() {
        output.push('\n');
        for total in &report.category_totals {
            let pct = report
                .category_percentages
                .iter()
                .find(|p| p.category == total.category)
                .map(|p| format!("%{}", p.percent))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {:<12}{:<16}{}\n",
                total.category.as_str(),
                format_minutes(total.minutes, locale),
                pct
            ));
        }
    }

    output
}

fn focus_bar(score: u8, band: FocusBand) -> String {
    let filled = (score as usize).div_ceil(10);
    let mark = match band {
        FocusBand::High => '█',
        FocusBand::Medium => '▓',
        FocusBand::Low => '░',
    };
    format!(
        "[{}{}]",
        mark.to_string().repeat(filled),
        " ".repeat(10 - filled)
    )
}
