//! Processor traits: the typed parse boundary and the pure processing step.

use crate::error::DomainError;
use onboard_rt_intake::{FieldSchema, NormalizedFields};
use serde::Serialize;
use serde_json::{Value, json};

/// Typed request built from normalized fields.
pub trait FromFields: Sized {
    /// Fields the normalizer must supply.
    const SCHEMA: FieldSchema;

    fn from_fields(fields: &NormalizedFields) -> Result<Self, DomainError>;

    /// Who the request is about, for progress messages.
    fn subject(&self) -> String;
}

/// A processing result that can be relayed as text and as structured data.
pub trait RenderOutput: Serialize {
    fn render_text(&self) -> String;

    fn to_data(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self).map_err(|err| DomainError::Internal(err.to_string()))
    }
}

/// Pure transformation from a typed request to a domain record.
pub trait DomainProcessor: Send + Sync {
    type Request: FromFields;
    type Output: RenderOutput;

    fn process(&self, request: Self::Request) -> Result<Self::Output, DomainError>;

    /// Parse and process in one step.
    fn process_fields(&self, fields: &NormalizedFields) -> Result<Self::Output, DomainError> {
        let request = Self::Request::from_fields(fields)?;
        self.process(request)
    }
}

/// Compact JSON rendering for records relayed to machine callers.
pub(crate) fn compact_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|err| json!({ "error": err.to_string() }).to_string())
}
