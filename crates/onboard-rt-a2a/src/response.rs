use crate::a2a;
use crate::a2a_types::JSONRPCId;
use onboard_rt_core::OnboardError;
use serde_json::{Value, json};

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const TASK_NOT_FOUND: i32 = -32001;
pub const UNSUPPORTED_OPERATION: i32 = -32004;

pub trait ResponseFormatter: Send + Sync {
    fn format_success(&self, id: Option<JSONRPCId>, result: Value) -> Value;
    fn format_stream(&self, id: Option<JSONRPCId>, chunks: Vec<Value>) -> Vec<Value>;
    fn format_error(&self, id: Option<JSONRPCId>, error: &OnboardError) -> Value;
}

pub struct JsonRpcResponseFormatter;

impl ResponseFormatter for JsonRpcResponseFormatter {
    fn format_success(&self, id: Option<JSONRPCId>, result: Value) -> Value {
        a2a::success_response(id, result)
    }

    /// Every stream event is its own success response sharing the request id.
    fn format_stream(&self, id: Option<JSONRPCId>, chunks: Vec<Value>) -> Vec<Value> {
        chunks
            .into_iter()
            .map(|chunk| a2a::success_response(id.clone(), chunk))
            .collect()
    }

    fn format_error(&self, id: Option<JSONRPCId>, error: &OnboardError) -> Value {
        let (code, message, data) = map_jsonrpc_error(error);
        a2a::error_response(id, code, &message, data)
    }
}

pub fn map_jsonrpc_error(error: &OnboardError) -> (i32, String, Option<Value>) {
    match error {
        OnboardError::Parse(details) => (
            PARSE_ERROR,
            "Parse error".to_string(),
            Some(json!({ "error": error.to_string(), "details": details })),
        ),
        OnboardError::InvalidArgument(details) => (
            INVALID_REQUEST,
            "Invalid request".to_string(),
            Some(json!({ "error": error.to_string(), "details": details })),
        ),
        OnboardError::MethodNotFound(method) => (
            METHOD_NOT_FOUND,
            "Method not found".to_string(),
            Some(json!({ "error": error.to_string(), "method": method })),
        ),
        OnboardError::InvalidParams(details) => (
            INVALID_PARAMS,
            "Invalid params".to_string(),
            Some(json!({ "error": error.to_string(), "details": details })),
        ),
        OnboardError::TaskNotFound(task_id) => (
            TASK_NOT_FOUND,
            "Task not found".to_string(),
            Some(json!({ "taskId": task_id })),
        ),
        OnboardError::Unsupported(message) => (UNSUPPORTED_OPERATION, message.clone(), None),
        _ => (
            INTERNAL_ERROR,
            "Internal error".to_string(),
            Some(json!({ "error": error.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_jsonrpc_codes() {
        let cases = [
            (OnboardError::InvalidArgument("bad".into()), INVALID_REQUEST),
            (OnboardError::MethodNotFound("x/y".into()), METHOD_NOT_FOUND),
            (OnboardError::InvalidParams("bad".into()), INVALID_PARAMS),
            (OnboardError::TaskNotFound("task-1".into()), TASK_NOT_FOUND),
            (OnboardError::Unsupported("nope".into()), UNSUPPORTED_OPERATION),
            (OnboardError::Internal("boom".into()), INTERNAL_ERROR),
            (OnboardError::Parse("eof".into()), PARSE_ERROR),
        ];
        for (error, code) in cases {
            assert_eq!(map_jsonrpc_error(&error).0, code, "{error}");
        }
    }

    #[test]
    fn serialization_failures_are_internal_errors() {
        let err = serde_json::to_value(std::collections::HashMap::from([((1, 2), 3)]))
            .unwrap_err();
        let (code, message, _) = map_jsonrpc_error(&OnboardError::Json(err));
        assert_eq!(code, INTERNAL_ERROR);
        assert_eq!(message, "Internal error");
    }

    #[test]
    fn unsupported_carries_its_message() {
        let formatter = JsonRpcResponseFormatter;
        let response = formatter.format_error(
            Some(JSONRPCId::Integer(7)),
            &OnboardError::Unsupported("Task cancellation is not supported".into()),
        );
        assert_eq!(response["id"], json!(7));
        assert_eq!(response["error"]["code"], json!(-32004));
        assert_eq!(
            response["error"]["message"],
            json!("Task cancellation is not supported")
        );
    }

    #[test]
    fn stream_chunks_share_the_request_id() {
        let formatter = JsonRpcResponseFormatter;
        let responses = formatter.format_stream(
            Some(JSONRPCId::String("req-1".into())),
            vec![json!({"kind": "task"}), json!({"kind": "status-update"})],
        );
        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r["id"] == json!("req-1")));
        assert_eq!(responses[1]["result"]["kind"], json!("status-update"));
    }
}
