//! Discovery and liveness documents.

use crate::config::AgentCardConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SUPPORTED_CONTENT_TYPES: [&str; 2] = ["text", "text/plain"];
pub const ONBOARDING_SKILL_ID: &str = "employee_onboarding";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn onboarding_skill() -> AgentSkill {
    AgentSkill {
        id: ONBOARDING_SKILL_ID.to_string(),
        name: "Employee Onboarding".to_string(),
        description: "Creates employee records from natural language onboarding requests"
            .to_string(),
        tags: strings(&["hr", "onboarding", "employee"]),
        examples: strings(&[
            "Onboard Sarah Williams as a Software Engineer",
            "Onboard John Smith as Senior Data Analyst",
            "Onboard Maria Garcia as Product Manager",
        ]),
    }
}

pub fn agent_card(config: &AgentCardConfig) -> AgentCard {
    AgentCard {
        name: config.name.clone(),
        description: config.description.clone(),
        url: config.url.clone(),
        version: config.version.clone(),
        default_input_modes: strings(&SUPPORTED_CONTENT_TYPES),
        default_output_modes: strings(&SUPPORTED_CONTENT_TYPES),
        capabilities: AgentCapabilities {
            streaming: true,
            push_notifications: true,
        },
        skills: vec![onboarding_skill()],
    }
}

pub fn health() -> Value {
    json!({ "status": "ok" })
}
