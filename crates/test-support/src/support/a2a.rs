//! In-memory A2A test client.

use onboard_rt_a2a::a2a::message_request;
use onboard_rt_a2a::A2aRequestHandler;
use onboard_rt_core::Result;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct A2aInMemoryClient {
    target: Arc<dyn A2aRequestHandler>,
    next_id: AtomicU64,
}

impl A2aInMemoryClient {
    pub fn new(target: Arc<dyn A2aRequestHandler>) -> Self {
        Self {
            target,
            next_id: AtomicU64::new(1),
        }
    }

    fn request_id(&self) -> String {
        format!("req-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub async fn send(&self, request: Value) -> Result<Vec<Value>> {
        self.target.handle_a2a(request).await
    }

    /// `message/send` (or `message/stream`) carrying one text part.
    pub async fn send_text(&self, text: &str, stream: bool) -> Result<Vec<Value>> {
        self.send(message_request(self.request_id(), text, stream))
            .await
    }

    /// Like [`send_text`](Self::send_text) but addressed to an existing task id.
    pub async fn send_text_to(&self, task_id: &str, text: &str) -> Result<Vec<Value>> {
        let mut request = message_request(self.request_id(), text, false);
        request["params"]["message"]["taskId"] = json!(task_id);
        self.send(request).await
    }

    /// `message/send` carrying one data part.
    pub async fn send_data(&self, data: Value, stream: bool) -> Result<Vec<Value>> {
        let method = if stream { "message/stream" } else { "message/send" };
        self.send(json!({
            "jsonrpc": "2.0",
            "id": self.request_id(),
            "method": method,
            "params": {
                "message": {
                    "kind": "message",
                    "messageId": format!("msg-{}", self.request_id()),
                    "role": "user",
                    "parts": [{ "kind": "data", "data": data }]
                }
            }
        }))
        .await
    }

    pub async fn call(&self, method: &str, params: Value) -> Result<Vec<Value>> {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": self.request_id(),
            "method": method,
            "params": params,
        }))
        .await
    }
}

/// The `result` member of every response, in order.
pub fn results(responses: &[Value]) -> Vec<Value> {
    responses
        .iter()
        .map(|response| response.get("result").cloned().unwrap_or(Value::Null))
        .collect()
}

pub fn error_code(response: &Value) -> Option<i64> {
    response.pointer("/error/code").and_then(Value::as_i64)
}

pub fn task_state(task: &Value) -> Option<&str> {
    task.pointer("/status/state").and_then(Value::as_str)
}

/// Text of the first part of the task's result artifact.
pub fn artifact_text(task: &Value) -> Option<&str> {
    task.pointer("/artifacts/0/parts/0/text")
        .and_then(Value::as_str)
}
