//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_countdown"))
        .args(args)
        .env("COUNTDOWN_DATA_DIR", data_dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env("COUNTDOWN_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn add_event(dir: &Path, title: &str, date: &str) -> String {
    let (code, stdout, stderr) = run_cli(
        dir,
        &["event", "add", "--title", title, "--date", date, "--time", "09:30"],
    );
    assert_eq!(code, 0, "event add failed: {stderr}");
    stdout.trim().to_string()
}

fn list_json(dir: &Path) -> Vec<serde_json::Value> {
    let (code, stdout, stderr) = run_cli(dir, &["event", "list", "--json"]);
    assert_eq!(code, 0, "event list failed: {stderr}");
    serde_json::from_str(&stdout).expect("list output is JSON")
}

#[test]
fn test_event_add_and_list() {
    let dir = TempDir::new().unwrap();
    let id = add_event(dir.path(), "Final Exam", "2099-05-01");
    assert!(!id.is_empty());

    let events = list_json(dir.path());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], id.as_str());
    assert_eq!(events[0]["title"], "Final Exam");
    assert_eq!(events[0]["tier"], "normal");
    assert!(events[0]["remaining"]["days"].as_u64().unwrap() > 365);
}

#[test]
fn test_event_list_is_newest_first() {
    let dir = TempDir::new().unwrap();
    add_event(dir.path(), "First", "2099-01-01");
    add_event(dir.path(), "Second", "2099-01-02");

    let events = list_json(dir.path());
    let titles: Vec<_> = events.iter().map(|e| e["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Second", "First"]);
}

#[test]
fn test_event_list_plain_text() {
    let dir = TempDir::new().unwrap();
    add_event(dir.path(), "Launch", "2000-01-01");

    let (code, stdout, _) = run_cli(dir.path(), &["event", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Launch"));
    assert!(stdout.contains("COMPLETED"));
}

#[test]
fn test_event_add_missing_field_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["event", "add", "--title", "  ", "--date", "2099-01-01", "--time", "09:30"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("title"), "stderr: {stderr}");
    assert!(list_json(dir.path()).is_empty());
}

#[test]
fn test_event_remove() {
    let dir = TempDir::new().unwrap();
    let keep = add_event(dir.path(), "Keep", "2099-01-01");
    let drop = add_event(dir.path(), "Drop", "2099-01-02");

    let (code, stdout, _) = run_cli(dir.path(), &["event", "remove", &drop]);
    assert_eq!(code, 0);
    assert!(stdout.contains("removed"));

    let events = list_json(dir.path());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], keep.as_str());

    let (code, stdout, _) = run_cli(dir.path(), &["event", "remove", "no-such-id"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no event"));
}

#[test]
fn test_event_clear() {
    let dir = TempDir::new().unwrap();
    add_event(dir.path(), "One", "2099-01-01");
    add_event(dir.path(), "Two", "2099-01-02");

    let (code, stdout, _) = run_cli(dir.path(), &["event", "clear", "--yes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("removed 2"));
    assert!(list_json(dir.path()).is_empty());
}

#[test]
fn test_event_show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["event", "show", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("missing"));
}

#[test]
fn test_generate_without_key_adds_nothing() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["event", "generate", "exams", "in", "May"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stderr.contains("0 event(s) added"));
}

#[test]
fn test_generate_against_mock_service() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let events = r#"[{"title":"Math Final","time":"2099-05-10T09:00:00Z","description":"Room 4"}]"#;
    let body = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": events }] } }]
    });
    let mock = server
        .mock("POST", "/v1beta/models/gemini-3-flash-preview:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create();

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "expander.endpoint", &server.url()]);
    assert_eq!(code, 0, "config set failed: {stderr}");

    let output = Command::new(env!("CARGO_BIN_EXE_countdown"))
        .args(["event", "generate", "my", "finals"])
        .env("COUNTDOWN_DATA_DIR", dir.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("COUNTDOWN_LOG", "off")
        .output()
        .unwrap();
    assert!(output.status.success());
    mock.assert();

    let events = list_json(dir.path());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Math Final");
    assert_eq!(events[0]["description"], "Room 4");
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "export.theme"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "indigo");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "export.theme", "rose"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "export.theme"]);
    assert_eq!(stdout.trim(), "rose");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "export.quality", "0"]);
    assert_eq!(code, 1);
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_export_writes_jpeg() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let id = add_event(dir.path(), "Final Exam", "2099-05-01");

    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &[
            "export",
            &id,
            "--theme",
            "white",
            "--typeface",
            "tech",
            "--out",
            out.path().to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0, "export failed: {stderr}");

    let path = out.path().join("Final_Exam.jpg");
    assert_eq!(stdout.trim(), path.display().to_string());
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
}

#[test]
fn test_export_rejects_unknown_theme() {
    let dir = TempDir::new().unwrap();
    let id = add_event(dir.path(), "Final Exam", "2099-05-01");
    let (code, _, _) = run_cli(dir.path(), &["export", &id, "--theme", "neon"]);
    assert_ne!(code, 0);
}

#[test]
fn test_watch_once() {
    let dir = TempDir::new().unwrap();
    add_event(dir.path(), "Board Meeting", "2099-03-03");

    let (code, stdout, _) = run_cli(dir.path(), &["watch", "--once"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Board Meeting"));
    assert!(stdout.contains("DAYS"));

    let (code, stdout, _) = run_cli(dir.path(), &["watch", "--once", "--json"]);
    assert_eq!(code, 0);
    let frames: Vec<serde_json::Value> = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(frames[0]["title"], "Board Meeting");
}
