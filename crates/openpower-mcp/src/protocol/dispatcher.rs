//! Request dispatcher — resolves a tool by name and invokes it.

use serde_json::Value;

use crate::tools::ToolRegistry;
use crate::types::{DiscoveryDocument, McpError, McpResult, ToolDefinition};

/// Bridges inbound requests to registered tools.
///
/// Tool results and tool errors are passed through untouched; the dispatcher
/// adds no retry, timeout, or recovery of its own.
pub struct Dispatcher {
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, name: &str, params: Value) -> McpResult<Value> {
        let Some(tool) = self.registry.resolve(name) else {
            tracing::warn!("Call to unknown tool: {name}");
            return Err(McpError::ToolNotFound(name.to_string()));
        };

        tracing::info!("Dispatching tool: {name}");

        tool.execute(params).await.inspect_err(|e| {
            tracing::warn!("Tool {name} failed: {e}");
        })
    }

    pub fn discovery(&self) -> DiscoveryDocument {
        DiscoveryDocument::new(self.registry.names())
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }
}
