//! A2A JSON-RPC request parsing and response envelopes.

use crate::a2a_types::{
    JSONRPCError, JSONRPCErrorResponse, JSONRPCId, JSONRPCRequest, JSONRPCSuccessResponse,
    MessageSendParams,
};
use onboard_rt_core::ids::ContextId;
use onboard_rt_core::{OnboardError, Result};
use serde_json::{Map, Value, json};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum A2aMethod {
    MessageSend,
    MessageStream,
    TasksGet,
    TasksCancel,
    TasksResubscribe,
    PushNotificationConfigSet,
    PushNotificationConfigGet,
}

impl A2aMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            A2aMethod::MessageSend => "message/send",
            A2aMethod::MessageStream => "message/stream",
            A2aMethod::TasksGet => "tasks/get",
            A2aMethod::TasksCancel => "tasks/cancel",
            A2aMethod::TasksResubscribe => "tasks/resubscribe",
            A2aMethod::PushNotificationConfigSet => "tasks/pushNotificationConfig/set",
            A2aMethod::PushNotificationConfigGet => "tasks/pushNotificationConfig/get",
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, A2aMethod::MessageSend | A2aMethod::MessageStream)
    }
}

impl std::str::FromStr for A2aMethod {
    type Err = OnboardError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "message/send" | "message.send" => Ok(A2aMethod::MessageSend),
            "message/stream" | "message.sendStream" | "message.stream" => {
                Ok(A2aMethod::MessageStream)
            }
            "tasks/get" | "tasks.get" => Ok(A2aMethod::TasksGet),
            "tasks/cancel" | "tasks.cancel" => Ok(A2aMethod::TasksCancel),
            "tasks/resubscribe" | "tasks.resubscribe" | "tasks.subscribe" => {
                Ok(A2aMethod::TasksResubscribe)
            }
            "tasks/pushNotificationConfig/set" | "tasks.pushNotificationConfig.set" => {
                Ok(A2aMethod::PushNotificationConfigSet)
            }
            "tasks/pushNotificationConfig/get" | "tasks.pushNotificationConfig.get" => {
                Ok(A2aMethod::PushNotificationConfigGet)
            }
            other => Err(OnboardError::MethodNotFound(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct A2aRequest {
    pub id: Option<JSONRPCId>,
    pub method: A2aMethod,
    pub params: Value,
    pub is_stream: bool,
    pub context_id: Option<ContextId>,
}

impl A2aRequest {
    pub fn from_value(value: Value) -> Result<Self> {
        let request: JSONRPCRequest = serde_json::from_value(value).map_err(|err| {
            OnboardError::InvalidArgument(format!("not a JSON-RPC request: {err}"))
        })?;
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(OnboardError::InvalidArgument(format!(
                "Unsupported jsonrpc version: {}",
                request.jsonrpc
            )));
        }

        let method: A2aMethod = request.method.parse()?;
        let params = match request.params.unwrap_or(Value::Null) {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(OnboardError::InvalidParams(format!(
                    "params must be an object, got {other}"
                )));
            }
        };

        let context_id = if method.is_message() {
            let parsed: MessageSendParams = serde_json::from_value(params.clone())
                .map_err(|err| OnboardError::InvalidParams(err.to_string()))?;
            parsed.message.context_id
        } else {
            None
        };

        Ok(Self {
            id: request.id,
            is_stream: method == A2aMethod::MessageStream
                || method == A2aMethod::TasksResubscribe,
            method,
            params,
            context_id,
        })
    }

    pub fn correlation_id(&self) -> Option<String> {
        self.id.as_ref().and_then(|id| match id {
            JSONRPCId::String(s) => Some(s.clone()),
            JSONRPCId::Integer(n) => Some(n.to_string()),
            JSONRPCId::Null => None,
        })
    }

    /// Decode the params object into a typed request.
    pub fn params<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.params.clone())
            .map_err(|err| OnboardError::InvalidParams(err.to_string()))
    }
}

#[derive(Debug)]
pub enum A2aOutcome {
    Response(Value),
    Stream(Vec<Value>),
}

pub fn success_response(id: Option<JSONRPCId>, result: Value) -> Value {
    serde_json::to_value(JSONRPCSuccessResponse {
        jsonrpc: JSONRPC_VERSION.to_string(),
        result,
        id,
    })
    .unwrap_or_else(|_| {
        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": null,
            "result": { "error": "serialization failed" }
        })
    })
}

pub fn error_response(
    id: Option<JSONRPCId>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let error = JSONRPCError {
        code,
        message: message.to_string(),
        data,
    };
    serde_json::to_value(JSONRPCErrorResponse {
        jsonrpc: JSONRPC_VERSION.to_string(),
        error,
        id,
    })
    .unwrap_or_else(|_| {
        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": null,
            "error": { "code": -32603, "message": "serialization failed" }
        })
    })
}

/// Best-effort id extraction so even rejected requests get a correlated error.
pub fn extract_jsonrpc_id(value: &Value) -> Option<JSONRPCId> {
    value
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value(id).ok())
}

/// Build a `message/send` (or `message/stream`) request around plain user text.
pub fn message_request(id: impl Into<String>, text: &str, stream: bool) -> Value {
    let method = if stream {
        A2aMethod::MessageStream
    } else {
        A2aMethod::MessageSend
    };
    let message = crate::a2a_types::Message::user_text(text);
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id.into(),
        "method": method.as_str(),
        "params": { "message": message },
    })
}
