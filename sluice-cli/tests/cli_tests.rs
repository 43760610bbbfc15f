//! Integration tests for the `sluice` binary.
//!
//! Runs the compiled binary against temp files and checks stdout and exit codes.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn sluice(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sluice"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("should spawn sluice");

    {
        let mut handle = child.stdin.take().expect("stdin piped");
        if let Some(input) = stdin {
            handle
                .write_all(input.as_bytes())
                .expect("should write stdin");
        }
    }

    child.wait_with_output().expect("should wait for sluice")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("valid UTF-8")
}

#[test]
fn test_grok_match_json_output() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sluice(
        dir.path(),
        &[
            "--output",
            "json",
            "grok",
            "--match",
            "^%{IPV4:ip} %{WORD:method}$",
            "10.0.0.1 GET",
        ],
        None,
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(report["unmatched"], 0);
    assert_eq!(report["results"][0]["fields"]["ip"], "10.0.0.1");
    assert_eq!(report["results"][0]["fields"]["method"], "GET");
}

#[test]
fn test_grok_no_match_exit_code() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sluice(
        dir.path(),
        &["grok", "--match", "^%{INT:n}$"],
        Some("12\nabc\n"),
    );

    assert_eq!(output.status.code(), Some(3), "no match should exit with 3");
    let text = stdout(&output);
    assert!(text.contains("no match"));
    assert!(text.contains("2 input(s), 1 matched, 1 unmatched"));
}

#[test]
fn test_grok_unresolved_macro_fails() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sluice(dir.path(), &["grok", "--match", "%{NOPE:x}", "line"], None);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unresolved macro '%{NOPE}'"), "stderr: {stderr}");
}

#[test]
fn test_patterns_includes_config_sources() {
    let dir = TempDir::new().expect("should create temp dir");
    let patterns = dir.path().join("patterns");
    std::fs::create_dir(&patterns).expect("should create patterns dir");
    std::fs::write(patterns.join("app"), "APP_ID app-\\d+\n").expect("should write patterns");
    std::fs::write(
        dir.path().join("sluice.toml"),
        format!("[transformer]\npattern_paths = [\"{}\"]\n", patterns.display()),
    )
    .expect("should write config");

    let output = sluice(dir.path(), &["--output", "json", "patterns"], None);

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    let names: Vec<&str> = report["patterns"]
        .as_array()
        .expect("patterns array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert!(names.contains(&"APP_ID"));
    assert!(names.contains(&"DATESTAMP"));
    assert_eq!(report["failed_sources"], 0);
}

#[test]
fn test_run_transforms_json_lines() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("actions.yml"),
        r#"
actions:
  - action: "grok(body)"
    match: "^%{WORD:method} %{UNIXPATH:path}$"
  - action: "move(method, http.method)"
"#,
    )
    .expect("should write actions");

    let output = sluice(
        dir.path(),
        &["run", "--actions", "actions.yml"],
        Some("{\"body\":\"GET /health\",\"host\":\"web-1\"}\nbroken line\n"),
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2, "keep policy emits failed events too");
    assert_eq!(lines[0]["http"]["method"], "GET");
    assert_eq!(lines[0]["path"], "/health");
    assert_eq!(lines[0]["host"], "web-1");
    assert_eq!(lines[1]["body"], "broken line");
}

#[test]
fn test_run_drop_policy_from_config() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("actions.yml"),
        "actions:\n  - action: \"grok(body)\"\n    match: \"^%{INT:n}$\"\n",
    )
    .expect("should write actions");
    std::fs::write(
        dir.path().join("sluice.toml"),
        "[transformer]\nactions_file = \"actions.yml\"\non_error = \"drop\"\n",
    )
    .expect("should write config");
    std::fs::write(dir.path().join("events.jsonl"), "1\nx\n2\n").expect("should write input");

    let output = sluice(dir.path(), &["run", "events.jsonl"], None);

    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec![r#"{"n":"1"}"#, r#"{"n":"2"}"#]);
}

#[test]
fn test_run_without_actions_is_config_error() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sluice(dir.path(), &["run"], Some(""));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_validate_invalid_file() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("sluice.toml"),
        "[general]\nlog_format = \"xml\"\n",
    )
    .expect("should write config");

    let output = sluice(dir.path(), &["config", "validate"], None);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("INVALID"));
}

#[test]
fn test_config_validate_builds_actions() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("actions.yml"),
        "actions:\n  - action: \"grok(body)\"\n    match: \"%{NOPE:x}\"\n",
    )
    .expect("should write actions");
    std::fs::write(
        dir.path().join("sluice.toml"),
        "[transformer]\nactions_file = \"actions.yml\"\n",
    )
    .expect("should write config");

    let output = sluice(dir.path(), &["--output", "json", "config", "validate"], None);

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("should be JSON");
    assert_eq!(report["valid"], serde_json::Value::Bool(false));
    assert!(
        report["errors"][0]
            .as_str()
            .is_some_and(|e| e.contains("unresolved macro")),
        "report: {report}"
    );
}

#[test]
fn test_config_show_section() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("sluice.toml"),
        "[general]\nlog_level = \"warn\"\n",
    )
    .expect("should write config");

    let output = sluice(dir.path(), &["config", "show", "--section", "general"], None);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[general]"));
    assert!(text.contains("log_level = \"warn\""));
}
