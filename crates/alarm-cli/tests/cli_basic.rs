//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary alarm file and config.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command with an isolated config and alarm file.
fn run_cli(dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let config = dir.path().join("config.toml");
    let store = dir.path().join("alarms.json");
    let output = Command::new(env!("CARGO_BIN_EXE_alarm-cli"))
        .arg("--config")
        .arg(&config)
        .arg("--store")
        .arg(&store)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn read_store(dir: &TempDir) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.path().join("alarms.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn write_config(dir: &Path, body: &str) {
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

#[test]
fn test_schedule_and_list() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["alarm", "schedule", "--offset", "30", "--channel", "sms"]);
    assert!(output.0 == 0, "schedule failed: {}", output.2);
    assert!(output.1.contains("Alarm scheduled:"));

    let output = run_cli(&dir, &["alarm", "list", "--json"]);
    assert!(output.0 == 0, "list failed: {}", output.2);
    let views: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    let views = views.as_array().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["index"], 0);
    assert_eq!(views[0]["status"], "Pending");
    assert_eq!(views[0]["alarm"]["channel"], "sms");
}

#[test]
fn test_schedule_reports_authentication() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["alarm", "schedule", "--offset", "5"]);

    assert!(output.0 == 0, "schedule failed: {}", output.2);
    assert!(output.1.contains("Authenticating user 'nicole.dominic'..."));
    assert!(output.1.contains("Authentication succeeded for 'nicole.dominic'."));
}

#[test]
fn test_schedule_rejects_huge_offset() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(
        &dir,
        &["alarm", "schedule", "--offset", &i64::MAX.to_string()],
    );

    assert!(output.0 == 1, "huge offset was accepted: {}", output.1);
    assert!(output.2.contains("out of range"));
    assert_eq!(read_store(&dir), serde_json::json!([]));
}

#[test]
fn test_list_is_per_user() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["alarm", "schedule", "--user", "alice", "--offset", "5"]);

    let output = run_cli(&dir, &["alarm", "list", "--user", "bob"]);
    assert!(output.0 == 0);
    assert!(output.1.contains("No alarms configured."));
}

#[test]
fn test_wrong_password_fails() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(
        &dir,
        &["alarm", "schedule", "--password", "nope", "--offset", "5"],
    );

    assert!(output.0 != 0, "schedule with wrong password succeeded");
    assert!(output.1.contains("Authentication error: wrong password for 'nicole.dominic'"));
    assert!(output.2.contains("error:"));
    assert_eq!(read_store(&dir), serde_json::json!([]));
}

#[test]
fn test_delete_out_of_range_keeps_store() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["alarm", "schedule", "--offset", "5"]);
    let before = read_store(&dir);

    let output = run_cli(&dir, &["alarm", "delete", "3"]);

    assert!(output.0 != 0);
    assert!(output.2.contains("Invalid alarm index 3"));
    assert_eq!(read_store(&dir), before);
}

#[test]
fn test_delete_by_index() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["alarm", "schedule", "--offset", "5", "--channel", "email"]);
    run_cli(&dir, &["alarm", "schedule", "--offset", "10", "--channel", "push"]);

    let output = run_cli(&dir, &["alarm", "delete", "0"]);
    assert!(output.0 == 0, "delete failed: {}", output.2);

    let store = read_store(&dir);
    let alarms = store.as_array().unwrap();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0]["channel"], "push");
}

#[test]
fn test_poll_notifies_past_alarm() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["alarm", "schedule", "--offset", "-5", "--channel", "push"]);

    let output = run_cli(
        &dir,
        &["alarm", "poll", "--iterations", "2", "--interval-ms", "0"],
    );

    assert!(output.0 == 0, "poll failed: {}", output.2);
    assert!(output.1.contains("Sending notification to nicole.dominic via push"));
    assert!(output.1.contains("No active alarms to notify."));
    assert_eq!(read_store(&dir)[0]["notified"], true);
}

#[test]
fn test_demo_runs_scenario() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        r#"
[demo]
poll_iterations = 2
poll_interval_ms = 0
alarms = [
    { offset_secs = -5, channel = "email" },
    { offset_secs = -4, channel = "sms" },
    { offset_secs = 3600, channel = "push" },
]
"#,
    );

    let output = run_cli(&dir, &[]);

    assert!(output.0 == 0, "demo failed: {}", output.2);
    assert!(output.1.contains("Authentication succeeded for 'nicole.dominic'."));
    assert!(output.1.contains("--- Configured alarms ---"));
    assert!(output.1.contains("Alarm deleted:"));
    assert!(output.1.contains("Sending notification to nicole.dominic via email"));
    assert!(!output.1.contains("via sms:"));
    assert!(output.1.contains("--- End of simulation ---"));

    let store = read_store(&dir);
    let alarms = store.as_array().unwrap();
    assert_eq!(alarms.len(), 2);
    assert_eq!(alarms[0]["notified"], true);
    assert_eq!(alarms[1]["notified"], false);
}

#[test]
fn test_demo_wrong_password_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "[demo]\npassword = \"nope\"\n");

    let output = run_cli(&dir, &["demo"]);

    assert!(output.0 != 0, "demo with wrong password succeeded");
    assert!(output.1.contains("Authentication failed. Ending session."));
    assert!(!output.1.contains("Scheduling new alarms"));
}

#[test]
fn test_poll_json_prints_one_report_per_pass() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["alarm", "schedule", "--offset", "-5", "--channel", "sms"]);

    let output = run_cli(
        &dir,
        &["alarm", "poll", "--json", "--iterations", "2", "--interval-ms", "0"],
    );

    assert!(output.0 == 0, "poll failed: {}", output.2);
    let reports: Vec<serde_json::Value> = output
        .1
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["notified"][0]["channel"], "sms");
    assert_eq!(reports[0]["notified"][0]["notified"], true);
    assert_eq!(reports[1]["notified"], serde_json::json!([]));
    assert_eq!(read_store(&dir)[0]["notified"], true);
}

#[test]
fn test_config_init_writes_defaults() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["config", "init"]);
    assert!(output.0 == 0, "config init failed: {}", output.2);

    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("expected_password = \"correct_password\""));
    assert!(written.contains("[demo]"));

    let output = run_cli(&dir, &["alarm", "schedule", "--offset", "5"]);
    assert!(output.0 == 0, "schedule with written config failed: {}", output.2);
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "message_template = \"custom\"\n");

    let output = run_cli(&dir, &["config", "init"]);
    assert!(output.0 != 0);
    assert!(output.2.contains("already exists"));
    let kept = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(kept.contains("custom"));

    let output = run_cli(&dir, &["config", "init", "--force"]);
    assert!(output.0 == 0, "forced init failed: {}", output.2);
    let replaced = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(!replaced.contains("custom"));
}

#[test]
fn test_config_path_prints_location() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["config", "path"]);

    assert!(output.0 == 0);
    assert!(output.1.trim().ends_with("config.toml"));
}
