use onboard_rt::relay::a2a::message_request;
use onboard_rt::{A2aRequestHandler, AgentConfig, OnboardError, WorkflowKind, build_agent};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;
use test_support::common::{fixture_path, onboarding_payload};

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn load_fixture() -> AgentConfig {
    let mut config =
        AgentConfig::from_file(&fixture_path("config/onboarding-agent.json")).unwrap();
    config.apply_env(no_env).unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn defaults_are_valid() {
    let config = AgentConfig::default();
    config.validate().unwrap();
    assert_eq!(config.agent, WorkflowKind::QuickHire);
    assert_eq!(config.relay.chunk_size, 80);
    assert_eq!(config.domain.email_domain, "example.com");
}

#[test]
fn file_values_override_defaults() {
    let config = load_fixture();
    assert_eq!(config.agent, WorkflowKind::Onboarding);
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.public_url(), "http://0.0.0.0:9090/");
    assert_eq!(config.card.name, "Onboarding Agent");
    assert_eq!(config.relay.chunk_size, 24);
    assert_eq!(config.relay.model, "onboarding-agent");
    assert_eq!(config.domain.employee_id_prefix, "E-");
    assert_eq!(
        config.domain.lookup.manager_for_department("engineering"),
        "Grace Hopper"
    );
}

#[test]
fn environment_overrides_file() {
    let mut config = load_fixture();
    config
        .apply_env(env_from(&[
            ("PORT", "7000"),
            ("ONBOARD_EMAIL_DOMAIN", "people.example"),
            ("ONBOARD_CHUNK_SIZE", "5"),
            ("ONBOARD_MODEL", "hr-bot"),
            ("ONBOARD_AGENT", "hr"),
        ]))
        .unwrap();
    assert_eq!(config.server.port, 7000);
    assert_eq!(config.domain.email_domain, "people.example");
    assert_eq!(config.relay.chunk_size, 5);
    assert_eq!(config.relay.model, "hr-bot");
    assert_eq!(config.agent, WorkflowKind::QuickHire);
}

#[test]
fn blank_environment_values_are_ignored() {
    let mut config = load_fixture();
    config
        .apply_env(env_from(&[("ONBOARD_EMAIL_DOMAIN", "  "), ("AGENT_URL", "")]))
        .unwrap();
    assert_eq!(config.domain.email_domain, "corp.example");
    assert_eq!(config.public_url(), "http://0.0.0.0:9090/");
}

#[test]
fn malformed_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agent.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = AgentConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, OnboardError::Config(_)));
    assert!(err.to_string().contains("agent.json"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = AgentConfig::from_file(Path::new("/nonexistent/onboard-agent.json")).unwrap_err();
    assert!(matches!(err, OnboardError::Io(_)));
}

#[test]
fn unknown_agent_kind_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agent.json");
    std::fs::write(&path, r#"{"agent": "payroll"}"#).unwrap();
    assert!(AgentConfig::from_file(&path).is_err());
}

#[test]
fn empty_prefix_fails_validation() {
    let mut config = AgentConfig::default();
    config.domain.employee_id_prefix.clear();
    assert!(matches!(config.validate(), Err(OnboardError::Config(_))));
}

#[tokio::test]
async fn configured_lookups_reach_the_onboarding_workflow() {
    let agent = build_agent(&load_fixture());
    let request = message_request("req-1", &onboarding_payload("2024-03-01").to_string(), false);
    let responses = agent.handle_a2a(request).await.unwrap();

    let artifact = &responses[0]["result"]["artifacts"][0];
    let text = artifact["parts"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Onboarding complete for Sarah Williams."));
    assert!(text.contains("Email: sarah.williams@corp.example"));
    assert!(text.contains("Manager: Grace Hopper"));
    assert!(text.contains("Access Groups: grp-eng, grp-github"));
    assert!(text.contains("Hardware: dev-laptop-eu"));
    assert_eq!(artifact["parts"][1]["data"]["startDate"], json!("2024-03-01"));
}
