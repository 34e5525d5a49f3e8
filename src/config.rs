//! Agent configuration: defaults, an optional JSON file, `.env`, then the environment.

use onboard_rt_a2a::workflow::WorkflowKind;
use onboard_rt_a2a::{AgentCardConfig, RelayConfig};
use onboard_rt_core::{OnboardError, Result};
use onboard_rt_domain::DomainConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Where the agent is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible URL; derived from host and port when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub agent: WorkflowKind,
    pub server: ServerConfig,
    pub card: AgentCardConfig,
    pub domain: DomainConfig,
    pub relay: RelayConfig,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer the optional file, `.env` and the process environment over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "loaded .env file");
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|err| {
            OnboardError::Config(format!("invalid config file {}: {err}", path.display()))
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(agent) = var("ONBOARD_AGENT") {
            self.agent = agent
                .parse()
                .map_err(|err: OnboardError| OnboardError::Config(err.to_string()))?;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(url) = var("AGENT_URL") {
            self.server.public_url = Some(url);
        } else if let (Some(subdomain), Some(domain)) = (var("CE_SUBDOMAIN"), var("CE_DOMAIN")) {
            self.server.public_url = Some(format!("https://{subdomain}.{domain}/"));
        }
        if let Some(domain) = var("ONBOARD_EMAIL_DOMAIN") {
            self.domain.email_domain = domain;
        }
        if let Some(size) = var("ONBOARD_CHUNK_SIZE") {
            self.relay.chunk_size = parse_env("ONBOARD_CHUNK_SIZE", &size)?;
        }
        if let Some(model) = var("ONBOARD_MODEL") {
            self.relay.model = model;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.relay.chunk_size == 0 {
            return Err(OnboardError::Config("relay.chunkSize must be positive".to_string()));
        }
        if self.domain.email_domain.trim().is_empty() {
            return Err(OnboardError::Config("domain.emailDomain must not be empty".to_string()));
        }
        if self.domain.employee_id_prefix.is_empty() || self.domain.directory_id_prefix.is_empty()
        {
            return Err(OnboardError::Config("identifier prefixes must not be empty".to_string()));
        }
        Ok(())
    }

    /// Public URL with a trailing slash.
    pub fn public_url(&self) -> String {
        let url = self
            .server
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}/", self.server.host, self.server.port));
        if url.ends_with('/') { url } else { format!("{url}/") }
    }

    /// Card identity advertised at the public URL.
    pub fn card_config(&self) -> AgentCardConfig {
        AgentCardConfig {
            url: self.public_url(),
            ..self.card.clone()
        }
    }

    pub fn with_agent(mut self, agent: WorkflowKind) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_domain(mut self, domain: DomainConfig) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_relay(mut self, relay: RelayConfig) -> Self {
        self.relay = relay;
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| OnboardError::Config(format!("{key} has an invalid value: {value:?}")))
}
