//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a fresh temporary
//! directory so config and the local database never touch the real profile.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_studyroom"))
        .args(args)
        .env("HOME", home)
        .env_remove("STUDYROOM_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_term_now_in_term() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["term", "now", "--date", "2025-03-10", "--region", "nsw"]);
    assert_eq!(out.trim(), "Term 1, Week 5 of 9");
}

#[test]
fn test_term_now_in_holidays() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["term", "now", "--date", "2025-04-15", "--region", "nsw"]);
    assert!(out.starts_with("Holidays"), "{out}");
    assert!(out.contains("Term 2"), "{out}");
}

#[test]
fn test_term_now_json() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(
        home.path(),
        &["term", "now", "--date", "2025-03-10", "--region", "NSW", "--json"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["week"], 5);
    assert_eq!(parsed["region"], "nsw");
    assert_eq!(parsed["term"]["label"], "Term 1");
}

#[test]
fn test_unknown_region_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["term", "now", "--region", "tas"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("tas"), "{stderr}");
}

#[test]
fn test_term_list_uses_configured_region() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["config", "set", "region", "vic"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "region"]).trim(), "vic");
    let out = run_ok(home.path(), &["term", "list"]);
    assert!(out.starts_with("Victoria"), "{out}");
}

#[test]
fn test_config_rejects_unknown_region() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "region", "narnia"]);
    assert_ne!(code, 0);
}

#[test]
fn test_event_add_list_remove() {
    let home = tempfile::tempdir().unwrap();
    let added = run_ok(
        home.path(),
        &["event", "add", "Maths exam", "--date", "2030-05-02", "--time", "09:30", "--kind", "exam"],
    );
    let id = added.trim().strip_prefix("Event added: ").unwrap().to_string();

    let listed: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["event", "list", "--json"])).unwrap();
    assert_eq!(listed[0]["title"], "Maths exam");
    assert_eq!(listed[0]["type"], "exam");

    run_ok(home.path(), &["event", "remove", &id]);
    let listed: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["event", "list", "--json"])).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[test]
fn test_event_import() {
    let home = tempfile::tempdir().unwrap();
    let ics = home.path().join("school.ics");
    std::fs::write(
        &ics,
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nSUMMARY:Swimming carnival\r\n\
DTSTART;VALUE=DATE:20300214\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
    )
    .unwrap();

    let out = run_ok(home.path(), &["event", "import", ics.to_str().unwrap()]);
    assert!(out.contains("Imported 1 event"), "{out}");

    let listed: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["event", "upcoming", "--json"])).unwrap();
    assert_eq!(listed[0]["title"], "Swimming carnival");
    assert_eq!(listed[0]["source"], "import");
}

#[test]
fn test_event_import_rejects_non_calendar() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("notes.txt");
    std::fs::write(&file, "not a calendar").unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["event", "import", file.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"), "{stderr}");
}

#[test]
fn test_deadline_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    run_ok(
        home.path(),
        &["deadline", "add", "Essay", "--due", "2030-06-01", "--priority", "high"],
    );
    let listed: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["deadline", "list", "--json"])).unwrap();
    assert_eq!(listed[0]["title"], "Essay");
    assert_eq!(listed[0]["priority"], "high");
}

#[test]
fn test_timer_start_pause_status() {
    let home = tempfile::tempdir().unwrap();
    let started: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["timer", "start"])).unwrap();
    assert_eq!(started["isActive"], true);
    assert_eq!(started["phase"], "study");

    let paused: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["timer", "pause"])).unwrap();
    assert_eq!(paused["isActive"], false);

    let skipped: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["timer", "skip"])).unwrap();
    assert_eq!(skipped["phase"], "break");
    assert_eq!(skipped["timeLeft"], 300);

    let status: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["timer", "status"])).unwrap();
    assert_eq!(status["phase"], "break");
    assert_eq!(status["isActive"], false);
    assert_eq!(status["progress"], 0.0);
}

#[test]
fn test_timer_settings_update_config() {
    let home = tempfile::tempdir().unwrap();
    let state: serde_json::Value = serde_json::from_str(&run_ok(
        home.path(),
        &["timer", "settings", "--study", "50", "--break", "10"],
    ))
    .unwrap();
    assert_eq!(state["timeLeft"], 3000);
    assert_eq!(state["settings"]["break"], 600);
    assert_eq!(run_ok(home.path(), &["config", "get", "timer.study_minutes"]).trim(), "50");
}

#[test]
fn test_stats_show_starts_at_zero() {
    let home = tempfile::tempdir().unwrap();
    let stats: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["stats", "show"])).unwrap();
    assert_eq!(stats["sessionsCompleted"], 0);
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["completions", "bash"]);
    assert!(out.contains("studyroom"));
}
