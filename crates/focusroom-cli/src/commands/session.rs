use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use focusroom_core::stats::format_minutes;
use focusroom_core::{Category, Config, Database, Session, SessionStore};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Log a session by hand
    Add {
        /// Focused minutes
        #[arg(long)]
        minutes: u64,
        /// Category (coding, lesson, project, book, reading, research)
        #[arg(long)]
        category: Option<Category>,
        /// Number of distractions during the session
        #[arg(long, default_value = "0")]
        distractions: u32,
        /// End time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List recorded sessions
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SessionAction::Add {
            minutes,
            category,
            distractions,
            at,
        } => {
            let category = category.unwrap_or_else(|| Config::load_or_default().timer.default_category);
            let session = Session::new(
                at.unwrap_or_else(Utc::now),
                minutes.saturating_mul(60),
                category,
                distractions,
            )
            .ok_or("session duration must be at least one minute")?;
            db.append(&session)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionAction::List { json } => {
            let sessions = db.load_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }
            if sessions.is_empty() {
                println!("No sessions recorded.");
                return Ok(());
            }
            let locale = Config::load_or_default().report.locale;
            for s in &sessions {
                println!(
                    "{}  {:<10}{:<14}{} distractions",
                    s.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    s.category.as_str(),
                    format_minutes(s.minutes(), locale),
                    s.distraction_count
                );
            }
        }
    }
    Ok(())
}
