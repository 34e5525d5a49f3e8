//! Chat-completions request builders and SSE collection.

use futures_util::StreamExt;
use onboard_rt_a2a::{ChatResponse, SseFrame};
use serde_json::{Value, json};

pub fn chat_body(content: &str, stream: bool) -> Value {
    json!({
        "model": "onboarding-agent",
        "stream": stream,
        "messages": [{ "role": "user", "content": content }]
    })
}

/// Drain a streamed response; panics on a one-shot response.
pub async fn collect_frames(response: ChatResponse) -> Vec<SseFrame> {
    match response {
        ChatResponse::Stream(stream) => stream.collect().await,
        ChatResponse::Json(body) => panic!("expected a stream, got {body}"),
    }
}

/// Concatenated `delta.content` of every frame.
pub fn streamed_content(frames: &[SseFrame]) -> String {
    frames.iter().filter_map(SseFrame::content).collect()
}

/// `choices[0].message.content` of a one-shot response.
pub fn completion_content(response: &ChatResponse) -> Option<&str> {
    match response {
        ChatResponse::Json(body) => body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str),
        ChatResponse::Stream(_) => None,
    }
}

/// The wire form of a stream, as an HTTP body would carry it.
pub fn encode_frames(frames: &[SseFrame]) -> String {
    frames.iter().map(SseFrame::encode).collect()
}
