//! Chat-completions chunk shapes and SSE framing.

use serde_json::{Value, json};
use uuid::Uuid;

pub const DONE_MARKER: &str = "[DONE]";
pub const CHUNK_OBJECT: &str = "chat.completion.chunk";
pub const COMPLETION_OBJECT: &str = "chat.completion";

/// One server-sent event.
#[derive(Debug, Clone, PartialEq)]
pub enum SseFrame {
    Data(Value),
    Done,
}

impl SseFrame {
    /// `data: <payload>\n\n`
    pub fn encode(&self) -> String {
        match self {
            SseFrame::Data(value) => format!("data: {value}\n\n"),
            SseFrame::Done => format!("data: {DONE_MARKER}\n\n"),
        }
    }

    /// Content fragment carried by a data frame, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            SseFrame::Data(value) => value
                .pointer("/choices/0/delta/content")
                .and_then(Value::as_str),
            SseFrame::Done => None,
        }
    }
}

/// Shared identity of every chunk in one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionMeta {
    pub id: String,
    pub model: String,
    pub created: i64,
}

impl CompletionMeta {
    pub fn new(model: impl Into<String>) -> Self {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(12);
        Self {
            id: format!("chatcmpl-{suffix}"),
            model: model.into(),
            created: chrono::Utc::now().timestamp(),
        }
    }

    fn chunk(&self, delta: Value, finish_reason: Option<&str>) -> Value {
        json!({
            "id": self.id,
            "object": CHUNK_OBJECT,
            "created": self.created,
            "model": self.model,
            "choices": [{
                "index": 0,
                "delta": delta,
                "finish_reason": finish_reason,
            }],
        })
    }

    pub fn role_chunk(&self) -> Value {
        self.chunk(json!({"role": "assistant"}), None)
    }

    pub fn content_chunk(&self, content: &str) -> Value {
        self.chunk(json!({"content": content}), None)
    }

    pub fn stop_chunk(&self) -> Value {
        self.chunk(json!({}), Some("stop"))
    }

    /// Non-streaming response body.
    pub fn completion(&self, content: &str) -> Value {
        json!({
            "id": self.id,
            "object": COMPLETION_OBJECT,
            "created": self.created,
            "model": self.model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop",
            }],
        })
    }
}

/// Split `text` into consecutive slices of at most `size` characters.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (index, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..index]);
            start = index;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
