//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration as StdDuration, Instant};

use alarmroom_core::{Database, Task, TaskStore};
use chrono::{Duration, Utc};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_alarmroom-cli"))
        .env("ALARMROOM_HOME", home)
        .env_remove("ALARMROOM_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_task_add_and_list() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(
        home.path(),
        &["task", "add", "--minutes", "30", "--label", "laundry", "--json"],
    );
    assert_eq!(code, 0, "task add failed");
    let created = parse_json(&stdout);
    assert_eq!(created[0]["kind"], "timer");
    assert_eq!(created[0]["originMinutes"], 30);

    let (code, _, _) = run_cli(home.path(), &["task", "add", "--minutes", "5", "--label", "tea"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(code, 0, "task list failed");
    let rows = parse_json(&stdout);
    let labels: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(labels, vec!["tea", "laundry"]);
}

#[test]
fn test_task_list_empty() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["task", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No reminders."));
}

#[test]
fn test_task_add_requires_one_schedule() {
    let home = tempfile::tempdir().unwrap();

    let (code, _, stderr) = run_cli(home.path(), &["task", "add", "--label", "nothing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("provide either a relative time or a clock time"));

    let (code, _, _) = run_cli(
        home.path(),
        &["task", "add", "--minutes", "5", "--at", "08:00"],
    );
    assert_ne!(code, 0);

    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(parse_json(&stdout), serde_json::json!([]));
}

#[test]
fn test_task_add_alarm_with_pre_alarm() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["task", "add", "--at", "23:59", "--pre", "0", "--json"],
    );
    assert_eq!(code, 0);
    let created = parse_json(&stdout);
    assert_eq!(created.as_array().unwrap().len(), 1);
    assert_eq!(created[0]["kind"], "alarm");
}

#[test]
fn test_task_delete_by_prefix() {
    let home = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(home.path(), &["task", "add", "--minutes", "10", "--json"]);
    let id = parse_json(&stdout)[0]["id"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(home.path(), &["task", "delete", &id[..8]]);
    assert_eq!(code, 0, "task delete failed");
    assert!(stdout.contains(&id));

    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(parse_json(&stdout), serde_json::json!([]));

    let (code, _, stderr) = run_cli(home.path(), &["task", "delete", &id]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no task matches"));
}

#[test]
fn test_voice_registers_with_trigger() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["voice", "15分後に会議", "--json"]);
    assert_eq!(code, 0);
    let outcome = parse_json(&stdout);
    assert_eq!(outcome["auto_submit"], false);
    assert_eq!(outcome["request"]["minutes"], "15");

    let (code, stdout, _) = run_cli(home.path(), &["voice", "15分後に会議をセット", "--json"]);
    assert_eq!(code, 0);
    let outcome = parse_json(&stdout);
    assert_eq!(outcome["created"].as_array().unwrap().len(), 1);

    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(parse_json(&stdout)[0]["label"], "会議");
}

#[test]
fn test_tick_fires_past_due_task() {
    let home = tempfile::tempdir().unwrap();
    let task = Task::alarm(Utc::now() - Duration::minutes(1), Some("overdue".into()));
    {
        let mut db = Database::open_at(&home.path().join("alarmroom.db")).unwrap();
        TaskStore::from_tasks([task.clone()]).persist(&mut db).unwrap();
    }

    let (code, stdout, stderr) = run_cli(home.path(), &["tick", "--json"]);
    assert_eq!(code, 0, "tick failed");
    let fired = parse_json(&stdout);
    assert_eq!(fired[0]["id"], task.id().to_string());
    assert!(stderr.contains("ALARM: overdue"));
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "alarm.timeout_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "60");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "alarm.simultaneous", "queue"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "alarm.simultaneous"]);
    assert_eq!(stdout.trim(), "queue");

    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "alarm.volume", "3"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_watch_quits_while_stdin_stays_open() {
    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_alarmroom-cli"))
        .env("ALARMROOM_HOME", home.path())
        .env_remove("ALARMROOM_LOG")
        .arg("watch")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn watch");

    // Hold the pipe open so the reader never sees EOF.
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"q\n").unwrap();
    stdin.flush().unwrap();

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if started.elapsed() > StdDuration::from_secs(5) {
            break None;
        }
        std::thread::sleep(StdDuration::from_millis(50));
    };
    if status.is_none() {
        child.kill().unwrap();
    }
    drop(stdin);

    let status = status.expect("watch still running 5s after 'q'");
    assert!(status.success());
}
