use async_trait::async_trait;
use onboard_rt_a2a::a2a::message_request;
use onboard_rt_a2a::a2a_store::{
    PushConfigRepository, TaskEventRecorder, TaskRepository, TaskStore, TaskUpdateEvent,
    TaskUpdateQueue,
};
use onboard_rt_a2a::a2a_types::{
    Artifact, Message, Task, TaskPushNotificationConfig, TaskState, TaskStatus,
};
use onboard_rt_a2a::workflow::WorkflowKind;
use onboard_rt_a2a::{A2aRequestHandler, OnboardAgent};
use onboard_rt_core::ids::{ContextId, TaskId};
use serde_json::{Value, json};
use std::sync::Arc;
use test_support::common::*;
use tokio::sync::Mutex;

const SENTENCE: &str = QUICK_HIRE_SENTENCE;

fn client_for(agent: &OnboardAgent) -> A2aInMemoryClient {
    A2aInMemoryClient::new(Arc::new(agent.clone()))
}

fn with_task_id(mut request: Value, task_id: &str) -> Value {
    request["params"]["message"]["taskId"] = json!(task_id);
    request
}

/// Every status before the last is non-final, the last is final and terminal.
fn assert_single_terminal(events: &[Value]) {
    let statuses: Vec<&Value> = events
        .iter()
        .filter(|event| event["kind"] == json!("status-update"))
        .collect();
    let (last, earlier) = statuses.split_last().expect("at least one status update");
    assert!(
        earlier.iter().all(|status| status["final"] == json!(false)),
        "status after a terminal state: {events:?}"
    );
    assert!(earlier.iter().all(|status| task_state(status) == Some("working")));
    assert_eq!(last["final"], json!(true));
    assert!(matches!(
        task_state(last),
        Some("input-required" | "completed" | "failed")
    ));
    let last_index = events.iter().rposition(|event| event == *last).unwrap();
    assert_eq!(last_index, events.len() - 1, "events follow the final status");
}

#[tokio::test]
async fn message_send_returns_completed_task() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let responses = client.send(message_request("req-1", SENTENCE, false)).await.unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], json!("req-1"));

    let task = &responses[0]["result"];
    assert_eq!(task["kind"], json!("task"));
    assert_eq!(task_state(task), Some("completed"));

    let artifact = &task["artifacts"][0];
    assert_eq!(artifact["name"], json!("onboarding_result"));
    let text = artifact_text(task).unwrap();
    assert!(text.starts_with("Employee onboarded successfully!"));
    assert!(text.contains("Email: sarah.williams@example.com"));
    assert_eq!(artifact["parts"][1]["data"]["fullName"], json!("Sarah Williams"));

    let history: Vec<&str> = task["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|message| message["role"].as_str().unwrap())
        .collect();
    assert_eq!(history, vec!["user", "agent", "agent"]);
}

#[tokio::test]
async fn message_stream_ends_with_single_final_update() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let responses = client.send(message_request("req-2", SENTENCE, true)).await.unwrap();
    assert_eq!(responses.len(), 5);
    assert!(responses.iter().all(|response| response["id"] == json!("req-2")));

    let events = results(&responses);
    assert_eq!(events[0]["kind"], json!("task"));
    assert_eq!(task_state(&events[0]), Some("working"));

    let kinds: Vec<&str> = events[1..]
        .iter()
        .map(|event| event["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["status-update", "status-update", "artifact-update", "status-update"]
    );
    assert_eq!(
        events[1]["status"]["message"]["parts"][0]["text"],
        json!("Processing employee onboarding request...")
    );
    assert_eq!(
        events[2]["status"]["message"]["parts"][0]["text"],
        json!("Creating employee record for Sarah Williams...")
    );
    assert_single_terminal(&events[1..]);
    assert_eq!(task_state(&events[4]), Some("completed"));
}

#[tokio::test]
async fn waiting_task_rejects_follow_up_messages() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let first = client
        .send(with_task_id(message_request("req-3", "hello", false), "task-hire"))
        .await
        .unwrap();
    let task = &first[0]["result"];
    assert_eq!(task["id"], json!("task-hire"));
    assert_eq!(task_state(task), Some("input-required"));
    let guidance = task["status"]["message"]["parts"][0]["text"].as_str().unwrap();
    assert!(guidance.contains("Onboard <Full Name> as <Job Title>"));

    let follow_up = client.send_text_to("task-hire", SENTENCE).await.unwrap();
    assert_eq!(error_code(&follow_up[0]), Some(-32602));

    let fetched = client
        .call("tasks/get", json!({ "id": "task-hire" }))
        .await
        .unwrap();
    let stored = &fetched[0]["result"];
    assert_eq!(task_state(stored), Some("input-required"));
    assert!(stored["artifacts"].as_array().unwrap().is_empty());
    let users = stored["history"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|message| message["role"] == json!("user"))
        .count();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn completed_task_rejects_further_messages() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let sent = client
        .send(with_task_id(message_request("req-4", SENTENCE, false), "task-done"))
        .await
        .unwrap();
    assert_eq!(task_state(&sent[0]["result"]), Some("completed"));

    let again = client.send_text_to("task-done", SENTENCE).await.unwrap();
    assert_eq!(error_code(&again[0]), Some(-32602));
}

#[tokio::test]
async fn no_status_follows_a_terminal_status() {
    let hr = agent(WorkflowKind::QuickHire);
    let client = client_for(&hr);
    for (task_id, text) in [
        ("task-a", SENTENCE),
        ("task-b", "hello"),
        ("task-c", "Please onboard someone"),
    ] {
        client
            .send(with_task_id(message_request("req-5", text, false), task_id))
            .await
            .unwrap();
        // A rejected follow-up must not reopen the task.
        client.send_text_to(task_id, SENTENCE).await.unwrap();

        let replay = client
            .call("tasks/resubscribe", json!({ "id": task_id }))
            .await
            .unwrap();
        let events = results(&replay);
        assert_eq!(events[0]["kind"], json!("task"));
        assert_single_terminal(&events[1..]);
    }

    let onboarding = agent(WorkflowKind::Onboarding);
    let streamed = client_for(&onboarding)
        .send_data(onboarding_payload("2023-13-40"), true)
        .await
        .unwrap();
    let events = results(&streamed);
    assert_single_terminal(&events[1..]);
    assert_eq!(task_state(events.last().unwrap()), Some("failed"));
}

#[tokio::test]
async fn concurrent_sends_to_one_task_id_admit_a_single_run() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let (left, right) = tokio::join!(
        client.send(with_task_id(message_request("req-6", SENTENCE, true), "task-race")),
        client.send(with_task_id(message_request("req-7", SENTENCE, true), "task-race")),
    );
    let (left, right) = (left.unwrap(), right.unwrap());
    let rejected = [&left, &right]
        .iter()
        .filter(|responses| error_code(&responses[0]) == Some(-32602))
        .count();
    assert_eq!(rejected, 1);

    let winner = if error_code(&left[0]).is_none() { left } else { right };
    assert_single_terminal(&results(&winner)[1..]);
}

#[tokio::test]
async fn plain_sends_leave_no_queued_updates() {
    let hr = agent(WorkflowKind::QuickHire);
    let client = client_for(&hr);
    let mut task_ids = Vec::new();
    for _ in 0..20 {
        let sent = client.send_text(SENTENCE, false).await.unwrap();
        task_ids.push(sent[0]["result"]["id"].as_str().unwrap().to_string());
    }

    let store = hr.task_store();
    let mut retained = 0;
    for task_id in &task_ids {
        retained += store.drain_updates(task_id).await.len();
    }
    assert_eq!(retained, 0);
}

#[tokio::test]
async fn tasks_get_honours_history_length() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let sent = client.send_text(SENTENCE, false).await.unwrap();
    let task_id = sent[0]["result"]["id"].as_str().unwrap().to_string();

    let fetched = client
        .call("tasks/get", json!({ "id": task_id, "historyLength": 1 }))
        .await
        .unwrap();
    let task = &fetched[0]["result"];
    assert_eq!(task_state(task), Some("completed"));
    assert_eq!(task["history"].as_array().unwrap().len(), 1);

    let missing = client
        .call("tasks/get", json!({ "id": "task-nope" }))
        .await
        .unwrap();
    assert_eq!(error_code(&missing[0]), Some(-32001));
}

#[tokio::test]
async fn tasks_cancel_is_rejected() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let sent = client.send_text(SENTENCE, false).await.unwrap();
    let task_id = sent[0]["result"]["id"].clone();

    let cancel = client
        .call("tasks/cancel", json!({ "id": task_id }))
        .await
        .unwrap();
    assert_eq!(error_code(&cancel[0]), Some(-32004));
    assert_eq!(
        cancel[0]["error"]["message"],
        json!("Task cancellation is not supported")
    );

    let unknown = client
        .call("tasks/cancel", json!({ "id": "task-nope" }))
        .await
        .unwrap();
    assert_eq!(error_code(&unknown[0]), Some(-32001));
}

#[tokio::test]
async fn resubscribe_replays_the_terminal_status() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let sent = client.send_text(SENTENCE, false).await.unwrap();
    let task_id = sent[0]["result"]["id"].clone();

    for _ in 0..2 {
        let replay = client
            .call("tasks/resubscribe", json!({ "id": task_id }))
            .await
            .unwrap();
        let events = results(&replay);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["kind"], json!("task"));
        assert_eq!(task_state(&events[1]), Some("completed"));
        assert_eq!(events[1]["final"], json!(true));
    }
}

#[tokio::test]
async fn protocol_errors_become_jsonrpc_errors() {
    let hr = agent(WorkflowKind::QuickHire);
    let client = client_for(&hr);

    let bad_version = client
        .send(json!({ "jsonrpc": "1.0", "id": 1, "method": "message/send", "params": {} }))
        .await
        .unwrap();
    assert_eq!(error_code(&bad_version[0]), Some(-32600));
    assert_eq!(bad_version[0]["id"], json!(1));

    let unknown_method = client.call("tasks/list", json!({})).await.unwrap();
    assert_eq!(error_code(&unknown_method[0]), Some(-32601));

    let bad_params = client
        .send(json!({ "jsonrpc": "2.0", "id": "req-8", "method": "message/send", "params": [1, 2] }))
        .await
        .unwrap();
    assert_eq!(error_code(&bad_params[0]), Some(-32602));

    let no_message = client.call("message/send", json!({})).await.unwrap();
    assert_eq!(error_code(&no_message[0]), Some(-32602));

    let unparseable = hr.handle_a2a_text("{\"jsonrpc\": \"2.0\",").await.unwrap();
    assert_eq!(error_code(&unparseable[0]), Some(-32700));
    assert_eq!(unparseable[0]["id"], Value::Null);

    let raw = hr
        .handle_a2a_text(&message_request("req-9", SENTENCE, false).to_string())
        .await
        .unwrap();
    assert_eq!(task_state(&raw[0]["result"]), Some("completed"));
}

#[tokio::test]
async fn subscribers_observe_updates_in_order() {
    let hr = agent(WorkflowKind::QuickHire);
    let mut updates = hr.subscribe_task_updates();
    client_for(&hr).send_text(SENTENCE, false).await.unwrap();

    let mut received = Vec::new();
    while let Ok(update) = updates.try_recv() {
        received.push(update);
    }
    assert_eq!(received.len(), 4);
    assert!(received[..3].iter().all(|update| !update.is_final()));
    assert!(received[3].is_final());
}

#[tokio::test]
async fn push_config_round_trips_and_receives_updates() {
    let hr = agent(WorkflowKind::QuickHire);
    let client = client_for(&hr);
    let mut deliveries = hr.subscribe_push_notifications();

    let mut request = with_task_id(message_request("req-10", SENTENCE, false), "task-push");
    request["params"]["configuration"] = json!({
        "pushNotificationConfig": { "url": "https://client.example/hook", "token": "t0k" }
    });
    let sent = client.send(request).await.unwrap();
    assert_eq!(task_state(&sent[0]["result"]), Some("completed"));

    let mut payloads = Vec::new();
    while let Ok(notification) = deliveries.try_recv() {
        assert_eq!(notification.task_id.as_str(), "task-push");
        assert_eq!(notification.url, "https://client.example/hook");
        assert_eq!(notification.token.as_deref(), Some("t0k"));
        payloads.push(notification.payload);
    }
    assert_eq!(payloads.len(), 4);
    assert_single_terminal(&payloads);

    let fetched = client
        .call("tasks/pushNotificationConfig/get", json!({ "id": "task-push" }))
        .await
        .unwrap();
    let config = &fetched[0]["result"];
    assert_eq!(config["taskId"], json!("task-push"));
    assert_eq!(config["pushNotificationConfig"]["id"], json!("task-push"));

    let replaced = client
        .call(
            "tasks/pushNotificationConfig/set",
            json!({
                "taskId": "task-push",
                "pushNotificationConfig": { "id": "hook-2", "url": "https://other.example/hook" }
            }),
        )
        .await
        .unwrap();
    assert_eq!(replaced[0]["result"]["pushNotificationConfig"]["id"], json!("hook-2"));

    let stale = client
        .call(
            "tasks/pushNotificationConfig/get",
            json!({ "id": "task-push", "pushNotificationConfigId": "task-push" }),
        )
        .await
        .unwrap();
    assert_eq!(error_code(&stale[0]), Some(-32602));
}

#[tokio::test]
async fn push_config_requires_a_known_task_and_a_url() {
    let client = client_for(&agent(WorkflowKind::QuickHire));
    let unknown = client
        .call(
            "tasks/pushNotificationConfig/set",
            json!({
                "taskId": "task-nope",
                "pushNotificationConfig": { "url": "https://client.example/hook" }
            }),
        )
        .await
        .unwrap();
    assert_eq!(error_code(&unknown[0]), Some(-32001));

    let sent = client.send_text(SENTENCE, false).await.unwrap();
    let task_id = sent[0]["result"]["id"].clone();
    let blank = client
        .call(
            "tasks/pushNotificationConfig/set",
            json!({ "taskId": task_id, "pushNotificationConfig": { "url": " " } }),
        )
        .await
        .unwrap();
    assert_eq!(error_code(&blank[0]), Some(-32602));

    let none = client
        .call("tasks/pushNotificationConfig/get", json!({ "id": task_id }))
        .await
        .unwrap();
    assert_eq!(error_code(&none[0]), Some(-32602));
}

/// Task store that loses artifacts, so a run cannot finish through its sink.
struct ArtifactDroppingStore(Mutex<TaskStore>);

#[async_trait]
impl TaskRepository for ArtifactDroppingStore {
    async fn upsert(&self, task: Task) -> Task {
        self.0.upsert(task).await
    }

    async fn open_or_reject(&self, task: Task) -> Result<Task, TaskState> {
        self.0.open_or_reject(task).await
    }

    async fn get(&self, id: &str, history_length: Option<usize>) -> Option<Task> {
        TaskRepository::get(&self.0, id, history_length).await
    }

    async fn insert_message(&self, message: &Message) {
        self.0.insert_message(message).await
    }
}

#[async_trait]
impl TaskEventRecorder for ArtifactDroppingStore {
    async fn record_status_update(
        &self,
        task_id: &TaskId,
        context_id: &ContextId,
        status: TaskStatus,
    ) -> Option<TaskUpdateEvent> {
        self.0.record_status_update(task_id, context_id, status).await
    }

    async fn record_artifact_update(
        &self,
        _task_id: &TaskId,
        _context_id: &ContextId,
        _artifact: Artifact,
    ) -> Option<TaskUpdateEvent> {
        None
    }
}

#[async_trait]
impl TaskUpdateQueue for ArtifactDroppingStore {
    async fn drain_updates(&self, task_id: &str) -> Vec<TaskUpdateEvent> {
        self.0.drain_updates(task_id).await
    }
}

#[async_trait]
impl PushConfigRepository for ArtifactDroppingStore {
    async fn set_push_config(
        &self,
        config: TaskPushNotificationConfig,
    ) -> Option<TaskPushNotificationConfig> {
        self.0.set_push_config(config).await
    }

    async fn get_push_config(&self, task_id: &str) -> Option<TaskPushNotificationConfig> {
        self.0.get_push_config(task_id).await
    }
}

#[tokio::test]
async fn aborted_run_still_ends_in_a_terminal_state() {
    let hr = OnboardAgent::builder()
        .with_workflow_kind(WorkflowKind::QuickHire)
        .with_task_store_backend(Arc::new(ArtifactDroppingStore(Mutex::new(TaskStore::new()))))
        .build();
    let client = client_for(&hr);

    let sent = client
        .send(with_task_id(message_request("req-11", SENTENCE, false), "task-lost"))
        .await
        .unwrap();
    assert_eq!(error_code(&sent[0]), Some(-32603));

    let replay = client
        .call("tasks/resubscribe", json!({ "id": "task-lost" }))
        .await
        .unwrap();
    let events = results(&replay);
    assert_single_terminal(&events[1..]);
    let last = events.last().unwrap();
    assert_eq!(task_state(last), Some("failed"));
    assert!(
        last["status"]["message"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("event sink closed")
    );
}
