//! End-to-end onboarding flows across agents and transports.

use onboard_rt::{ChatCompletionsHandler, WorkflowKind};
use serde_json::{Value, json};
use std::sync::Arc;
use test_support::common::*;

/// `E-` followed by eight uppercase hex digits.
fn is_employee_id(id: &str) -> bool {
    id.strip_prefix("E-").is_some_and(|hex| {
        hex.len() == 8 && hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    })
}

fn client(kind: WorkflowKind) -> A2aInMemoryClient {
    A2aInMemoryClient::new(Arc::new(agent(kind)))
}

#[tokio::test]
async fn hr_record_feeds_it_provisioning() {
    let hr = client(WorkflowKind::QuickHire);
    let it = client(WorkflowKind::Provisioning);

    let responses = hr.send_text(QUICK_HIRE_SENTENCE, false).await.unwrap();
    let task = &results(&responses)[0];
    assert_eq!(task_state(task), Some("completed"));
    let record = task["artifacts"][0]["parts"][1]["data"].clone();
    assert!(is_employee_id(record["employeeId"].as_str().unwrap()));

    let responses = it.send_data(record.clone(), true).await.unwrap();
    let events = results(&responses);
    let last = events.last().unwrap();
    assert_eq!(last["final"], json!(true));
    assert_eq!(task_state(last), Some("completed"));

    let artifact = events
        .iter()
        .find(|event| event["kind"] == json!("artifact-update"))
        .unwrap();
    let provisioned: Value =
        serde_json::from_str(artifact["artifact"]["parts"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(provisioned["status"], json!("success"));
}

#[tokio::test]
async fn new_hire_composes_hr_and_it_results() {
    let new_hire = client(WorkflowKind::NewHire);
    let responses = new_hire.send_text(NEW_HIRE_SENTENCE, false).await.unwrap();
    let task = &results(&responses)[0];
    assert_eq!(task_state(task), Some("completed"));

    let combined: Value = serde_json::from_str(artifact_text(task).unwrap()).unwrap();
    assert_eq!(combined["hr"]["fullName"], json!("John Smith"));
    assert_eq!(combined["hr"]["jobTitle"], json!("Analyst"));
    assert_eq!(combined["hr"]["email"], json!("john.smith@example.com"));
    assert_eq!(combined["it"]["status"], json!("success"));
}

#[tokio::test]
async fn repeated_requests_differ_only_in_identifiers() {
    let hr = client(WorkflowKind::QuickHire);
    let first = results(&hr.send_text(QUICK_HIRE_SENTENCE, false).await.unwrap());
    let second = results(&hr.send_text(QUICK_HIRE_SENTENCE, false).await.unwrap());

    let mut a = first[0]["artifacts"][0]["parts"][1]["data"].clone();
    let mut b = second[0]["artifacts"][0]["parts"][1]["data"].clone();
    assert_ne!(a["employeeId"], b["employeeId"]);
    a["employeeId"] = Value::Null;
    b["employeeId"] = Value::Null;
    assert_eq!(a, b);
}

#[tokio::test]
async fn onboarding_rejects_impossible_start_date() {
    let onboarding = client(WorkflowKind::Onboarding);
    let responses = onboarding
        .send_data(onboarding_payload("2023-13-40"), false)
        .await
        .unwrap();
    let task = &results(&responses)[0];
    assert_eq!(task_state(task), Some("failed"));
    let message = task["status"]["message"]["parts"][0]["text"].as_str().unwrap();
    assert!(message.contains("startDate"));
    assert!(task["artifacts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_object_asks_for_every_field() {
    let onboarding = client(WorkflowKind::Onboarding);
    let responses = onboarding.send_data(json!({}), false).await.unwrap();
    let task = &results(&responses)[0];
    assert_eq!(task_state(task), Some("input-required"));
    let guidance = task["status"]["message"]["parts"][0]["text"].as_str().unwrap();
    assert!(guidance.starts_with(
        "missing required fields: firstName, lastName, email, role, department, location, startDate"
    ));
}

#[tokio::test]
async fn follow_up_message_to_waiting_task_is_rejected() {
    let hr = client(WorkflowKind::QuickHire);
    let first = results(&hr.send_text("Please onboard someone", false).await.unwrap());
    let task_id = first[0]["id"].as_str().unwrap().to_string();
    assert_eq!(task_state(&first[0]), Some("input-required"));

    let second = hr.send_text_to(&task_id, QUICK_HIRE_SENTENCE).await.unwrap();
    assert_eq!(error_code(&second[0]), Some(-32602));

    let fetched = results(&hr.call("tasks/get", json!({ "id": task_id })).await.unwrap());
    assert_eq!(task_state(&fetched[0]), Some("input-required"));
    let history = fetched[0]["history"].as_array().unwrap();
    assert_eq!(history.first().unwrap()["role"], json!("user"));
    assert_eq!(history.iter().filter(|m| m["role"] == json!("user")).count(), 1);
}

#[tokio::test]
async fn chat_stream_matches_wire_format() {
    let hr = agent_with_chunk_size(WorkflowKind::QuickHire, 12);
    let frames = collect_frames(hr.complete(chat_body(QUICK_HIRE_SENTENCE, true)).await.unwrap()).await;
    let wire = encode_frames(&frames);
    assert!(wire.ends_with("data: [DONE]\n\n"));
    assert_eq!(wire.matches("data: ").count(), frames.len());

    let content = streamed_content(&frames);
    let id_line = content
        .lines()
        .find_map(|line| line.strip_prefix("Employee ID: "))
        .unwrap();
    assert!(is_employee_id(id_line));
    assert!(content.ends_with("Job Title: Software Engineer"));
}

#[tokio::test]
async fn chat_json_reports_guidance_for_unparseable_text() {
    let hr = agent(WorkflowKind::QuickHire);
    let response = hr.complete(chat_body("What's the weather?", false)).await.unwrap();
    let content = completion_content(&response).unwrap();
    let error: Value = serde_json::from_str(content).unwrap();
    assert!(error["error"].as_str().unwrap().contains("Example: Onboard Sarah Williams"));
}
