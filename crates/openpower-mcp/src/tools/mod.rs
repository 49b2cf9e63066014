//! MCP tool implementations.

pub mod browser;
pub mod models;
pub mod registry;
pub mod sequential_thinking;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{McpResult, ToolDefinition};

pub use browser::BrowserTool;
pub use models::ModelsTool;
pub use registry::ToolRegistry;
pub use sequential_thinking::SequentialThinkingTool;

/// A named capability invoked with a JSON object of parameters.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key and URL path segment.
    fn name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, params: Value) -> McpResult<Value>;
}
