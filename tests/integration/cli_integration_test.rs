//! Integration tests for the onboard-agent CLI
//!
//! These tests spawn the real binary and check what each subcommand prints.

use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const ENV_OVERRIDES: [&str; 8] = [
    "PORT",
    "AGENT_URL",
    "CE_SUBDOMAIN",
    "CE_DOMAIN",
    "ONBOARD_AGENT",
    "ONBOARD_EMAIL_DOMAIN",
    "ONBOARD_CHUNK_SIZE",
    "ONBOARD_MODEL",
];

/// A command isolated from the caller's environment and any `.env` file.
fn command(workdir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_onboard-agent"));
    command.current_dir(workdir).env("RUST_LOG", "off");
    for key in ENV_OVERRIDES {
        command.env_remove(key);
    }
    command
}

fn run(args: &[&str]) -> Output {
    let workdir = TempDir::new().unwrap();
    command(workdir.path())
        .args(args)
        .output()
        .expect("failed to execute onboard-agent")
}

fn stdout_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect()
}

#[test]
fn test_cli_help_lists_subcommands() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for subcommand in ["card", "health", "send", "chat"] {
        assert!(stdout.contains(subcommand), "help should mention {subcommand}");
    }
}

#[test]
fn test_cli_health() {
    let output = run(&["health"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines, vec![serde_json::json!({"status": "ok"})]);
}

#[test]
fn test_cli_card_uses_environment_url() {
    let workdir = TempDir::new().unwrap();
    let output = command(workdir.path())
        .env("CE_SUBDOMAIN", "hr-agent")
        .env("CE_DOMAIN", "apps.example.test")
        .arg("card")
        .output()
        .unwrap();
    assert!(output.status.success());
    let card: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(card["url"], "https://hr-agent.apps.example.test/");
    assert_eq!(card["skills"][0]["id"], "employee_onboarding");
}

#[test]
fn test_cli_send_sentence() {
    let output = run(&["send", "Onboard Maria Garcia as Product Manager"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    let task = &lines[0]["result"];
    assert_eq!(task["status"]["state"], "completed");
    let text = task["artifacts"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.contains("Email: maria.garcia@example.com"));
}

#[test]
fn test_cli_send_stream_reads_stdin() {
    let workdir = TempDir::new().unwrap();
    let mut child = command(workdir.path())
        .args(["--agent", "it", "send", "--stream"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"employeeId": "E-1", "fullName": "Ada Lovelace", "email": "ada@example.com", "jobTitle": "CTO"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines[0]["result"]["kind"], "task");
    let last = &lines[lines.len() - 1]["result"];
    assert_eq!(last["final"], true);
    assert_eq!(last["status"]["state"], "completed");
}

#[test]
fn test_cli_chat_stream_prints_sse() {
    let output = run(&["chat", "--stream", "Onboard Sarah Williams as a Software Engineer"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("data: {"));
    assert!(stdout.ends_with("data: [DONE]\n\n"));
    assert!(stdout.contains("\"finish_reason\":\"stop\""));
}

#[test]
fn test_cli_rejects_unknown_agent() {
    let output = run(&["--agent", "payroll", "health"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_config_file_sets_model() {
    let workdir = TempDir::new().unwrap();
    let config_path = workdir.path().join("agent.json");
    std::fs::write(&config_path, r#"{"relay": {"model": "hr-bot"}}"#).unwrap();

    let output = command(workdir.path())
        .args(["--config", config_path.to_str().unwrap(), "chat", "Onboard Ada as CTO"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["model"], "hr-bot");
    assert_eq!(body["object"], "chat.completion");
}
