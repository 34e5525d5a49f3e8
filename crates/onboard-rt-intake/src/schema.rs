use serde_json::{Map, Value};

/// How a parsed "Onboard <Full Name> as <Role>" sentence fills a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceMapping {
    /// Full name and role go to one field each.
    FullName {
        name: &'static str,
        role: &'static str,
    },
    /// The first word of the name is the first name, the rest the last name.
    SplitName {
        first: &'static str,
        last: &'static str,
        role: &'static str,
    },
}

/// The field set a workflow expects, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub sentence: Option<SentenceMapping>,
}

impl FieldSchema {
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            name,
            fields,
            sentence: None,
        }
    }

    /// Accept free-text sentences as a last-resort input shape.
    pub const fn with_sentence(mut self, mapping: SentenceMapping) -> Self {
        self.sentence = Some(mapping);
        self
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// True when strictly more than half of the schema's fields are keys of `map`.
    pub fn majority_present(&self, map: &Map<String, Value>) -> bool {
        let present = self
            .fields
            .iter()
            .filter(|field| map.contains_key(**field))
            .count();
        present * 2 > self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::FieldSchema;
    use serde_json::json;

    const SCHEMA: FieldSchema = FieldSchema::new("test", &["a", "b", "c", "d"]);

    #[test]
    fn majority_requires_more_than_half() {
        let half = json!({"a": 1, "b": 2});
        let more = json!({"a": 1, "b": 2, "c": 3});
        assert!(!SCHEMA.majority_present(half.as_object().unwrap()));
        assert!(SCHEMA.majority_present(more.as_object().unwrap()));
    }

    #[test]
    fn unrelated_keys_do_not_count() {
        let map = json!({"action": "x", "input": {}, "a": 1});
        assert!(!SCHEMA.majority_present(map.as_object().unwrap()));
    }
}
