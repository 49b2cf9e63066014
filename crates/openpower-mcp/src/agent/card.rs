//! Agent descriptor document served at `/.well-known/agent.json`.

use serde::{Deserialize, Serialize};

pub const AGENT_PROTOCOL_VERSION: &str = "0.3.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
    pub mcp: bool,
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            streaming: true,
            push_notifications: true,
            mcp: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub protocol_version: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub capabilities: AgentCapabilities,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub skills: Vec<AgentSkill>,
    #[serde(default)]
    pub mcp_tools: Vec<String>,
}

impl AgentCard {
    /// The OpenPower browser automation agent, reachable at `url`.
    pub fn openpower(url: &str) -> Self {
        let modes = vec!["text/plain".to_string(), "application/json".to_string()];
        Self {
            protocol_version: AGENT_PROTOCOL_VERSION.to_string(),
            name: "OpenPower Agent".to_string(),
            description: "Universal Browser Automation Server with unified REST API".to_string(),
            url: url.to_string(),
            version: "1.0.0".to_string(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: modes.clone(),
            default_output_modes: modes,
            skills: vec![AgentSkill {
                id: "browser-automation".to_string(),
                name: "Browser Automation".to_string(),
                description: "Automate browser interactions using Chromium".to_string(),
                tags: vec![
                    "automation".to_string(),
                    "browser".to_string(),
                    "web".to_string(),
                ],
            }],
            mcp_tools: Vec::new(),
        }
    }

    pub fn with_mcp_tools(mut self, tools: Vec<String>) -> Self {
        self.mcp_tools = tools;
        self
    }
}
