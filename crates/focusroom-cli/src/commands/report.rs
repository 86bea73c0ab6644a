use chrono::Local;
use clap::Args;
use focusroom_core::stats::render_text;
use focusroom_core::{aggregate, Config, Database, FocusBand, Locale, Report, SessionStore, Window};
use serde::Serialize;

#[derive(Args)]
pub struct ReportArgs {
    /// daily, weekly or monthly (defaults to report.default_window)
    window: Option<Window>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
    /// Display language (en, tr)
    #[arg(long)]
    locale: Option<Locale>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    #[serde(flatten)]
    report: &'a Report,
    best_day_label: String,
    best_hour_label: String,
    focus_band: FocusBand,
}

pub fn run(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let window = args.window.unwrap_or(config.report.default_window);
    let locale = args.locale.unwrap_or(config.report.locale);

    let db = Database::open()?;
    let sessions = db.load_all()?;
    let report = aggregate(&sessions, window, &Local::now());

    if args.json {
        let view = ReportView {
            report: &report,
            best_day_label: report.best_day_label(locale),
            best_hour_label: report.best_hour_label(),
            focus_band: report.focus_band(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&report, locale));
    }
    Ok(())
}
