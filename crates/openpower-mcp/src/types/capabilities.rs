//! Discovery document and server identity.

use serde::{Deserialize, Serialize};

pub const DISCOVERY_VERSION: &str = "1.0";
pub const SERVER_NAME: &str = "openpower-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub streaming: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            streaming: true,
            is_async: true,
        }
    }
}

/// Payload served at `/.well-known/mcp.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    pub version: String,
    pub tools: Vec<String>,
    pub capabilities: ServerCapabilities,
}

impl DiscoveryDocument {
    pub fn new(tools: Vec<String>) -> Self {
        Self {
            version: DISCOVERY_VERSION.to_string(),
            tools,
            capabilities: ServerCapabilities::default(),
        }
    }
}
