//! Inbound payload shapes.

use crate::error::IntakeError;
use serde_json::{Map, Value};

/// What arrived on the wire, before any schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundPayload {
    /// A bare string: JSON text or a natural-language sentence.
    Text(String),
    /// A JSON object, possibly wrapped in an envelope.
    Fields(Map<String, Value>),
    /// Chat-completions messages; the last user message carries the request.
    ChatMessages(Vec<Value>),
    /// A2A message parts; a data part wins over text parts.
    MessageParts(Vec<Value>),
    Unsupported(&'static str),
}

/// A payload reduced to the two shapes the normalizer understands.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Candidate {
    Text(String),
    Fields(Map<String, Value>),
}

impl InboundPayload {
    /// Classify an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => InboundPayload::Text(text),
            Value::Array(items) => {
                if !items.is_empty() && items.iter().all(is_chat_message) {
                    InboundPayload::ChatMessages(items)
                } else {
                    InboundPayload::Unsupported("array payload is not a list of chat messages")
                }
            }
            Value::Object(mut map) => {
                if matches!(map.get("messages"), Some(Value::Array(_))) {
                    if let Some(Value::Array(messages)) = map.remove("messages") {
                        return InboundPayload::ChatMessages(messages);
                    }
                }
                if matches!(map.get("parts"), Some(Value::Array(_))) {
                    if let Some(Value::Array(parts)) = map.remove("parts") {
                        return InboundPayload::MessageParts(parts);
                    }
                }
                let nested_parts = map
                    .get("params")
                    .and_then(|params| params.get("message"))
                    .or_else(|| map.get("message"))
                    .and_then(|message| message.get("parts"))
                    .and_then(Value::as_array)
                    .cloned();
                if let Some(parts) = nested_parts {
                    return InboundPayload::MessageParts(parts);
                }
                InboundPayload::Fields(map)
            }
            Value::Null => InboundPayload::Unsupported("empty payload"),
            Value::Bool(_) => InboundPayload::Unsupported("boolean payload"),
            Value::Number(_) => InboundPayload::Unsupported("numeric payload"),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        InboundPayload::Text(text.into())
    }

    pub(crate) fn into_candidate(self) -> Result<Candidate, IntakeError> {
        match self {
            InboundPayload::Text(text) => Ok(Candidate::Text(text)),
            InboundPayload::Fields(map) => Ok(Candidate::Fields(map)),
            InboundPayload::ChatMessages(messages) => last_user_content(&messages),
            InboundPayload::MessageParts(parts) => parts_candidate(&parts),
            InboundPayload::Unsupported(reason) => {
                Err(IntakeError::MalformedInput(reason.to_string()))
            }
        }
    }
}

impl From<Value> for InboundPayload {
    fn from(value: Value) -> Self {
        InboundPayload::from_value(value)
    }
}

fn is_chat_message(value: &Value) -> bool {
    value.get("role").and_then(Value::as_str).is_some() && value.get("content").is_some()
}

fn last_user_content(messages: &[Value]) -> Result<Candidate, IntakeError> {
    let message = messages
        .iter()
        .rev()
        .find(|message| message.get("role").and_then(Value::as_str) == Some("user"))
        .ok_or_else(|| IntakeError::MalformedInput("no user message in conversation".into()))?;

    match message.get("content") {
        Some(Value::String(text)) => Ok(Candidate::Text(text.clone())),
        Some(Value::Array(parts)) => {
            let texts = collect_texts(parts);
            if texts.is_empty() {
                Err(IntakeError::MalformedInput(
                    "user message has no text content".into(),
                ))
            } else {
                Ok(Candidate::Text(texts.join("\n")))
            }
        }
        Some(Value::Object(map)) => Ok(Candidate::Fields(map.clone())),
        _ => Err(IntakeError::MalformedInput(
            "user message content must be text".into(),
        )),
    }
}

fn parts_candidate(parts: &[Value]) -> Result<Candidate, IntakeError> {
    let data = parts.iter().find_map(|part| {
        let is_data = part
            .get("kind")
            .or_else(|| part.get("type"))
            .and_then(Value::as_str)
            .is_none_or(|kind| kind == "data");
        if is_data {
            part.get("data").and_then(Value::as_object)
        } else {
            None
        }
    });
    if let Some(map) = data {
        return Ok(Candidate::Fields(map.clone()));
    }

    let texts = collect_texts(parts);
    if texts.is_empty() {
        return Err(IntakeError::MalformedInput(
            "message has no text or data parts".into(),
        ));
    }
    Ok(Candidate::Text(texts.join("\n")))
}

fn collect_texts(parts: &[Value]) -> Vec<&str> {
    parts
        .iter()
        .filter_map(|part| match part {
            Value::String(text) => Some(text.as_str()),
            other => other.get("text").and_then(Value::as_str),
        })
        .collect()
}
