//! Tool: models — Load models into the shared cache and list what is loaded.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use openpower::{ModelLoader, ModelManager, TokenizerSpec};

use crate::types::{McpError, McpResult, ToolDefinition};

use super::Tool;

pub const NAME: &str = "models";

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum ModelsParams {
    List,
    Load { model_id: String },
}

pub struct ModelsTool<L: ModelLoader> {
    manager: ModelManager<L>,
}

impl<L: ModelLoader> ModelsTool<L> {
    pub fn new(manager: ModelManager<L>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &ModelManager<L> {
        &self.manager
    }
}

#[async_trait]
impl<L> Tool for ModelsTool<L>
where
    L: ModelLoader<Tokenizer = TokenizerSpec>,
{
    fn name(&self) -> &str {
        NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.to_string(),
            description: Some("Load hub models into the local cache and list loaded models".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["list", "load"]
                    },
                    "model_id": {
                        "type": "string",
                        "description": "Hub identifier, e.g. org/model (required for load)"
                    }
                },
                "required": ["action"]
            }),
        }
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: ModelsParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        match params {
            ModelsParams::List => Ok(json!({ "models": self.manager.list_models().await })),
            ModelsParams::Load { model_id } => {
                openpower::validate_model_id(&model_id)?;

                let cached = self.manager.is_loaded(&model_id).await;
                let (_model, tokenizer) = self.manager.get_or_load(&model_id).await?;

                Ok(json!({
                    "status": "loaded",
                    "model_id": model_id,
                    "cached": cached,
                    "vocab_size": tokenizer.vocab_size()
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use openpower::{OpenPowerError, OpenPowerResult};

    struct FakeLoader;

    #[async_trait]
    impl ModelLoader for FakeLoader {
        type Model = ();
        type Tokenizer = TokenizerSpec;

        async fn load(&self, model_id: &str, cache_dir: &Path) -> OpenPowerResult<((), TokenizerSpec)> {
            if model_id.starts_with("private/") {
                return Err(OpenPowerError::Model(format!("{model_id}: HTTP 401")));
            }
            Ok((
                (),
                TokenizerSpec {
                    path: cache_dir.join("tokenizer.json"),
                    definition: json!({ "model": { "vocab": { "x": 0, "y": 1 } } }),
                },
            ))
        }
    }

    fn tool(dir: &tempfile::TempDir) -> ModelsTool<FakeLoader> {
        ModelsTool::new(ModelManager::new(dir.path(), FakeLoader).unwrap())
    }

    #[test]
    fn test_load_then_cached() {
        let dir = tempfile::tempdir().unwrap();
        let tool = tool(&dir);

        let first = tokio_test::block_on(tool.execute(json!({ "action": "load", "model_id": "org/tiny" })))
            .unwrap();
        assert_eq!(first["status"], "loaded");
        assert_eq!(first["cached"], false);
        assert_eq!(first["vocab_size"], 2);

        let second = tokio_test::block_on(tool.execute(json!({ "action": "load", "model_id": "org/tiny" })))
            .unwrap();
        assert_eq!(second["cached"], true);

        let list = tokio_test::block_on(tool.execute(json!({ "action": "list" }))).unwrap();
        assert_eq!(list["models"], json!(["org/tiny"]));
    }

    #[tokio::test]
    async fn test_bad_params() {
        let dir = tempfile::tempdir().unwrap();
        let tool = tool(&dir);

        let err = tool.execute(json!({ "action": "load" })).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));

        let err = tool.execute(json!({ "action": "unload" })).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_path_like_ids_are_invalid_params() {
        let dir = tempfile::tempdir().unwrap();
        let tool = tool(&dir);

        for model_id in ["../../x", "/etc/x", "org/../../x", ""] {
            let err = tool
                .execute(json!({ "action": "load", "model_id": model_id }))
                .await
                .unwrap_err();
            assert!(matches!(err, McpError::InvalidParams(_)), "{model_id:?} accepted");
        }
        assert!(!dir.path().join("org").exists());

        let list = tool.execute(json!({ "action": "list" })).await.unwrap();
        assert_eq!(list["models"], json!([]));
    }

    #[tokio::test]
    async fn test_loader_failure_is_model_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = tool(&dir);

        let err = tool
            .execute(json!({ "action": "load", "model_id": "private/gated" }))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::Model(_)));
    }
}
