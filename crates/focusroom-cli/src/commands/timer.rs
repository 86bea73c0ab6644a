use std::time::Duration;

use clap::Subcommand;
use focusroom_core::{
    AppState, Category, Config, Database, Event, MemoryStore, Phase, SessionStore, SessionTimer,
    SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::warn;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive timer, reading commands from stdin
    ///
    /// Commands: start, pause, resume, commit, discard, reset, away, back,
    /// target <minutes>, category <name>, status, help, quit.
    /// Events are printed to stdout as JSON lines.
    Run {
        /// Target in minutes (defaults to timer.target_minutes)
        #[arg(long)]
        minutes: Option<u32>,
        /// Category (defaults to timer.default_category)
        #[arg(long)]
        category: Option<Category>,
        /// Start counting immediately
        #[arg(long)]
        auto_start: bool,
        /// Length of one timer second in milliseconds
        #[arg(long, default_value = "1000", hide = true)]
        tick_millis: u64,
    },
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostCommand {
    Start,
    Pause,
    Resume,
    Commit,
    Discard,
    Reset,
    Away,
    Back,
    Target(u32),
    Category(Category),
    Status,
    Help,
    Quit,
}

const HELP: &str = "commands: start | pause | resume | commit | discard | reset | away | back | \
target <minutes> | category <name> | status | quit";

fn parse_command(line: &str) -> Result<Option<HostCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    let cmd = match (word.to_lowercase().as_str(), arg) {
        ("start" | "s", None) => HostCommand::Start,
        ("pause" | "p", None) => HostCommand::Pause,
        ("resume" | "r", None) => HostCommand::Resume,
        ("commit" | "save" | "c", None) => HostCommand::Commit,
        ("discard" | "cancel" | "d", None) => HostCommand::Discard,
        ("reset" | "x", None) => HostCommand::Reset,
        ("away" | "bg", None) => HostCommand::Away,
        ("back" | "fg", None) => HostCommand::Back,
        ("status", None) => HostCommand::Status,
        ("help" | "?", None) => HostCommand::Help,
        ("quit" | "q" | "exit", None) => HostCommand::Quit,
        ("target", Some(m)) => HostCommand::Target(
            m.parse()
                .map_err(|_| format!("target needs a number of minutes, got '{m}'"))?,
        ),
        ("category", Some(c)) => HostCommand::Category(c.parse()?),
        _ => return Err(format!("unrecognized command: {line}")),
    };
    Ok(Some(cmd))
}

fn apply(timer: &mut SessionTimer, cmd: &HostCommand) -> Option<Event> {
    match cmd {
        HostCommand::Start => timer.start(),
        HostCommand::Pause => timer.pause(true),
        HostCommand::Resume => timer.resume(),
        HostCommand::Commit => timer.commit(),
        HostCommand::Discard => timer.discard(),
        HostCommand::Reset => timer.reset(),
        HostCommand::Away => timer.handle_app_state(AppState::Background),
        HostCommand::Back => timer.handle_app_state(AppState::Active),
        HostCommand::Target(m) => timer.set_target_minutes(*m),
        HostCommand::Category(c) => timer.select_category(*c),
        HostCommand::Status => Some(timer.snapshot()),
        HostCommand::Help | HostCommand::Quit => None,
    }
}

fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    match event {
        Event::TimerPaused { prompt: true, .. } => {
            eprintln!("paused: resume | commit | discard");
        }
        Event::SessionRecorded { summary, .. } => {
            eprintln!(
                "session: {} - {} min - {} distractions",
                summary.category, summary.minutes, summary.distractions
            );
        }
        _ => {}
    }
    Ok(())
}

fn open_store() -> Box<dyn SessionStore> {
    match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            warn!(error = %e, "session database unavailable, sessions will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            minutes,
            category,
            auto_start,
            tick_millis,
        } => {
            let config = Config::load_or_default();
            let mut timer = SessionTimer::new(SystemClock, open_store());
            timer.set_target_minutes(minutes.unwrap_or(config.timer.target_minutes));
            timer.select_category(category.unwrap_or(config.timer.default_category));

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result =
                runtime.block_on(host(timer, auto_start, Duration::from_millis(tick_millis.max(1))));
            // A pending stdin read cannot be cancelled; don't wait for it.
            runtime.shutdown_background();
            result
        }
    }
}

/// Drive the timer: one tick per period, commands from stdin.
///
/// Once stdin closes, the host keeps ticking until the timer stops running.
async fn host(
    mut timer: SessionTimer,
    auto_start: bool,
    period: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stdin_open = true;

    emit(&timer.snapshot())?;
    if auto_start {
        if let Some(event) = timer.start() {
            emit(&event)?;
        }
    }
    interval.reset();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(event) = timer.tick() {
                    emit(&event)?;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => stdin_open = false,
                    Some(line) => match parse_command(&line) {
                        Ok(None) => {}
                        Ok(Some(HostCommand::Quit)) => break,
                        Ok(Some(HostCommand::Help)) => eprintln!("{HELP}"),
                        Ok(Some(cmd)) => {
                            if let Some(event) = apply(&mut timer, &cmd) {
                                if matches!(event, Event::TimerStarted { .. } | Event::TimerResumed { .. }) {
                                    interval.reset();
                                }
                                emit(&event)?;
                            }
                        }
                        Err(e) => eprintln!("{e}"),
                    },
                }
            }
        }

        if !stdin_open && timer.phase() != Phase::Running {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use focusroom_core::ManualClock;

    #[test]
    fn parses_plain_commands_and_aliases() {
        assert_eq!(parse_command("start").unwrap(), Some(HostCommand::Start));
        assert_eq!(parse_command("  P ").unwrap(), Some(HostCommand::Pause));
        assert_eq!(parse_command("save").unwrap(), Some(HostCommand::Commit));
        assert_eq!(parse_command("bg").unwrap(), Some(HostCommand::Away));
        assert_eq!(parse_command("q").unwrap(), Some(HostCommand::Quit));
        assert_eq!(parse_command("").unwrap(), None);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_command("target 50").unwrap(), Some(HostCommand::Target(50)));
        assert_eq!(
            parse_command("category kitap").unwrap(),
            Some(HostCommand::Category(Category::Book))
        );
        assert!(parse_command("target soon").is_err());
        assert!(parse_command("category gaming").is_err());
        assert!(parse_command("start now").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn away_and_back_map_to_lifecycle_edges() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
        let mut timer = SessionTimer::new(clock, MemoryStore::new());
        apply(&mut timer, &HostCommand::Start);
        let paused = apply(&mut timer, &HostCommand::Away);
        assert!(matches!(paused, Some(Event::TimerPaused { prompt: false, .. })));
        assert!(apply(&mut timer, &HostCommand::Back).is_none());
        assert_eq!(timer.phase(), Phase::Paused);
        assert_eq!(timer.distraction_count(), 1);
    }
}
