//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and verify
//! outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_focusroom"))
        .args(args)
        .env("FOCUSROOM_DATA_DIR", data_dir)
        .env_remove("FOCUSROOM_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("CLI did not finish");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect()
}

#[test]
fn test_session_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["session", "add", "--minutes", "25", "--category", "coding"],
        None,
    );
    assert_eq!(code, 0, "session add failed");

    let (code, stdout, _) = run_cli(dir.path(), &["session", "list", "--json"], None);
    assert_eq!(code, 0, "session list failed");
    let sessions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["duration_secs"], 1500);
    assert_eq!(sessions[0]["category"], "coding");
}

#[test]
fn test_session_add_rejects_zero_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["session", "add", "--minutes", "0"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_report_daily_json() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(
        dir.path(),
        &["session", "add", "--minutes", "25", "--category", "coding"],
        None,
    );
    run_cli(
        dir.path(),
        &["session", "add", "--minutes", "10", "--category", "book", "--distractions", "2"],
        None,
    );

    let (code, stdout, _) = run_cli(dir.path(), &["report", "daily", "--json"], None);
    assert_eq!(code, 0, "report failed");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["window"], "daily");
    assert_eq!(report["total_minutes"], 35);
    assert_eq!(report["total_distractions"], 2);
    assert_eq!(report["focus_score"], 23);
    assert_eq!(report["focus_band"], "low");
    assert_eq!(report["category_totals"][0]["category"], "coding");
    assert_eq!(report["category_totals"][0]["minutes"], 25);
}

#[test]
fn test_report_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["report", "weekly"], None);
    assert_eq!(code, 0, "report failed");
    assert!(stdout.contains("Focus Report (Weekly)"));
    assert!(stdout.contains("0 / 100"));
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.target_minutes"], None);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "25");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.target_minutes", "50"], None);
    assert_eq!(code, 0, "config set failed");

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.target_minutes"], None);
    assert_eq!(stdout.trim(), "50");
}

#[test]
fn test_config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "timer.nope"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_timer_commit_without_elapsed_time() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["timer", "run", "--tick-millis", "600000"],
        Some("start\npause\ncommit\nquit\n"),
    );
    assert_eq!(code, 0, "timer run failed");
    let types: Vec<String> = json_lines(&stdout)
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        types,
        vec!["StateSnapshot", "TimerStarted", "TimerPaused", "TimerReset"]
    );

    let (_, stdout, _) = run_cli(dir.path(), &["session", "list", "--json"], None);
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn test_timer_runs_to_completion_when_stdin_closes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "timer",
            "run",
            "--minutes",
            "1",
            "--category",
            "research",
            "--auto-start",
            "--tick-millis",
            "1",
        ],
        None,
    );
    assert_eq!(code, 0, "timer run failed");
    let events = json_lines(&stdout);
    let recorded = events.last().unwrap();
    assert_eq!(recorded["type"], "SessionRecorded");
    assert_eq!(recorded["session"]["duration_secs"], 60);
    assert_eq!(recorded["finished_by_timer"], true);

    let (_, stdout, _) = run_cli(dir.path(), &["session", "list", "--json"], None);
    let sessions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(sessions.as_array().unwrap().len(), 1);
    assert_eq!(sessions[0]["category"], "research");
}

#[test]
fn test_timer_away_counts_a_distraction() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["timer", "run", "--tick-millis", "600000"],
        Some("start\naway\nback\nstatus\nquit\n"),
    );
    assert_eq!(code, 0, "timer run failed");
    let events = json_lines(&stdout);
    let paused = events.iter().find(|e| e["type"] == "TimerPaused").unwrap();
    assert_eq!(paused["reason"], "interrupted");
    assert_eq!(paused["prompt"], false);
    let status = events.last().unwrap();
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["phase"], "paused");
    assert_eq!(status["distraction_count"], 1);
}
