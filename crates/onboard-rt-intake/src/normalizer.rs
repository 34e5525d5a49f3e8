//! Schema-driven request normalization.

use crate::error::IntakeError;
use crate::payload::{Candidate, InboundPayload};
use crate::schema::{FieldSchema, SentenceMapping};
use crate::sentence::parse_onboard_sentence;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Every field of a schema, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    schema: FieldSchema,
    values: BTreeMap<&'static str, String>,
}

impl NormalizedFields {
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Value of a schema field. Fields outside the schema read as empty.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.schema
            .fields
            .iter()
            .map(move |field| (*field, self.get(field)))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(field, value)| (field.to_string(), Value::String(value.to_string())))
                .collect(),
        )
    }
}

/// Resolves inbound payloads against one [`FieldSchema`].
///
/// Resolution order:
/// 1. a mapping with a majority of the schema's fields is taken as-is;
/// 2. a string holding a JSON object is parsed and treated as a mapping;
/// 3. one level of `{"action", "input"}` or `{"message": ...}` envelope is unwrapped;
/// 4. free text is matched against the "Onboard <Full Name> as <Role>" sentence.
///
/// The resulting mapping must then carry every schema field.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    schema: FieldSchema,
}

impl Normalizer {
    pub fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn normalize(&self, payload: InboundPayload) -> Result<NormalizedFields, IntakeError> {
        let map = match payload.into_candidate()? {
            Candidate::Fields(map) => self.resolve_map(map, true)?,
            Candidate::Text(text) => self.resolve_text(&text, true)?,
        };
        let fields = self.collect(&map);
        match &fields {
            Ok(_) => debug!(schema = self.schema.name, "request normalized"),
            Err(err) => debug!(schema = self.schema.name, error = %err, "request rejected"),
        }
        fields
    }

    /// Convenience for callers holding raw JSON.
    pub fn normalize_value(&self, value: Value) -> Result<NormalizedFields, IntakeError> {
        self.normalize(InboundPayload::from_value(value))
    }

    fn resolve_map(
        &self,
        map: Map<String, Value>,
        allow_unwrap: bool,
    ) -> Result<Map<String, Value>, IntakeError> {
        if !allow_unwrap || self.schema.majority_present(&map) {
            return Ok(map);
        }
        match envelope_inner(&map) {
            Some(Value::Object(inner)) => self.resolve_map(inner.clone(), false),
            Some(Value::String(inner)) => self.resolve_text(inner, false),
            _ => Ok(map),
        }
    }

    fn resolve_text(
        &self,
        text: &str,
        allow_unwrap: bool,
    ) -> Result<Map<String, Value>, IntakeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MalformedInput("request text is empty".into()));
        }
        if trimmed.starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
                return self.resolve_map(map, allow_unwrap);
            }
        }
        self.resolve_sentence(trimmed)
    }

    fn resolve_sentence(&self, text: &str) -> Result<Map<String, Value>, IntakeError> {
        let Some(mapping) = self.schema.sentence else {
            return Err(IntakeError::MalformedInput(format!(
                "expected a JSON object with fields: {}",
                self.schema.fields.join(", ")
            )));
        };
        let sentence = parse_onboard_sentence(text).ok_or_else(|| {
            IntakeError::MalformedInput(
                "expected a request like \"Onboard <Full Name> as <Job Title>\"".into(),
            )
        })?;

        let mut map = Map::new();
        match mapping {
            SentenceMapping::FullName { name, role } => {
                map.insert(name.into(), Value::String(sentence.full_name.clone()));
                map.insert(role.into(), Value::String(sentence.role.clone()));
            }
            SentenceMapping::SplitName { first, last, role } => {
                let (first_name, last_name) = sentence.split_name();
                map.insert(first.into(), Value::String(first_name.to_string()));
                if let Some(last_name) = last_name {
                    map.insert(last.into(), Value::String(last_name.to_string()));
                }
                map.insert(role.into(), Value::String(sentence.role.clone()));
            }
        }
        Ok(map)
    }

    fn collect(&self, map: &Map<String, Value>) -> Result<NormalizedFields, IntakeError> {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();
        for field in self.schema.fields {
            match map.get(*field).map(scalar_text) {
                Some(Ok(Some(value))) => {
                    values.insert(*field, value);
                }
                Some(Ok(None)) | None => missing.push((*field).to_string()),
                Some(Err(())) => {
                    return Err(IntakeError::MalformedInput(format!(
                        "field {field} must be a string"
                    )));
                }
            }
        }
        if !missing.is_empty() {
            return Err(IntakeError::MissingFields(missing));
        }
        Ok(NormalizedFields {
            schema: self.schema,
            values,
        })
    }
}

fn envelope_inner(map: &Map<String, Value>) -> Option<&Value> {
    if map.contains_key("action") {
        if let Some(input) = map.get("input") {
            return Some(input);
        }
    }
    match map.get("message") {
        Some(inner @ (Value::Object(_) | Value::String(_))) => Some(inner),
        _ => None,
    }
}

/// `Ok(None)` for null or blank values, `Err` for nested structures.
fn scalar_text(value: &Value) -> Result<Option<String>, ()> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(_) | Value::Object(_) => return Err(()),
    };
    Ok((!text.is_empty()).then_some(text))
}
