use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: usize = 80;
pub const DEFAULT_MODEL: &str = "onboarding-agent";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Chat relay tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    /// Characters per streamed content chunk.
    pub chunk_size: usize,
    /// Model name reported when the request does not name one.
    pub model: String,
    /// Frames buffered between producer and consumer.
    pub channel_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            model: DEFAULT_MODEL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RelayConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Identity advertised in the agent card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCardConfig {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
}

impl Default for AgentCardConfig {
    fn default() -> Self {
        Self {
            name: "HR Onboarding Agent".to_string(),
            description: "Creates employee records and onboards new hires.".to_string(),
            url: "http://localhost:8080/".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
