//! Tool: sequential-thinking — Record, revise, and branch a chain of thoughts.

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use openpower::{Thought, ThoughtLedger};

use crate::types::{McpError, McpResult, ToolDefinition};

use super::Tool;

pub const NAME: &str = "sequential-thinking";

/// Owns one ledger for the lifetime of the tool instance.
#[derive(Default)]
pub struct SequentialThinkingTool {
    ledger: Mutex<ThoughtLedger>,
}

impl SequentialThinkingTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently in the ledger.
    pub async fn len(&self) -> usize {
        self.ledger.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ledger.lock().await.is_empty()
    }

    /// Clear the ledger.
    pub async fn reset(&self) {
        self.ledger.lock().await.reset();
    }
}

#[async_trait]
impl Tool for SequentialThinkingTool {
    fn name(&self) -> &str {
        NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.to_string(),
            description: Some(
                "Dynamic and reflective problem-solving through thought sequences".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "thought": { "type": "string" },
                    "thought_number": { "type": "integer", "minimum": 1 },
                    "total_thoughts": { "type": "integer", "minimum": 1 },
                    "next_thought_needed": { "type": "boolean" },
                    "branch_from_thought": { "type": "integer", "minimum": 1 },
                    "branch_id": { "type": "string" },
                    "is_revision": { "type": "boolean", "default": false },
                    "needs_more_thoughts": { "type": "boolean", "default": false },
                    "revises_thought": { "type": "integer", "minimum": 1 }
                },
                "required": ["thought", "thought_number", "total_thoughts", "next_thought_needed"]
            }),
        }
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let thought = Thought::from_value(params)?;

        let record = {
            let mut ledger = self.ledger.lock().await;
            ledger.record(thought)?
        };

        serde_json::to_value(record).map_err(|e| McpError::InternalError(e.to_string()))
    }
}
