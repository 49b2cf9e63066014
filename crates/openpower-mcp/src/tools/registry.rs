//! Tool registration and lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use openpower::{ChromiumBrowser, HubLoader, ModelManager};

use crate::config::ServerConfig;
use crate::types::{McpResult, ToolDefinition};

use super::{BrowserTool, ModelsTool, SequentialThinkingTool, Tool};

/// Name → tool map. Registering an existing name replaces the previous tool.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in tools, wired from `config`.
    pub fn with_default_tools(config: &ServerConfig) -> McpResult<Self> {
        let browser = ChromiumBrowser::new(config.chromium.clone())
            .with_navigation_timeout(config.navigation_timeout);
        let models = ModelManager::new(
            config.model_cache.clone(),
            HubLoader::new(config.hub_endpoint.clone()),
        )?;

        let mut registry = Self::new();
        registry.register(Arc::new(SequentialThinkingTool::new()));
        registry.register(Arc::new(BrowserTool::new(Arc::new(browser))));
        registry.register(Arc::new(ModelsTool::new(models)));
        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!("Replaced tool registration: {name}");
        } else {
            tracing::debug!("Registered tool: {name}");
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Echo {
        name: &'static str,
        tag: &'static str,
    }

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            self.name
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.name.to_string(),
                description: None,
                input_schema: json!({ "type": "object" }),
            }
        }

        async fn execute(&self, params: Value) -> McpResult<Value> {
            Ok(json!({ "tag": self.tag, "params": params }))
        }
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo { name: "echo", tag: "first" }));
        registry.register(Arc::new(Echo { name: "echo", tag: "second" }));
        assert_eq!(registry.len(), 1);

        let tool = registry.resolve("echo").unwrap();
        let result = tokio_test::block_on(tool.execute(json!({}))).unwrap();
        assert_eq!(result["tag"], "second");
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo { name: "echo", tag: "only" }));
        assert!(registry.resolve("Echo").is_none());
        assert!(registry.resolve("echo ").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_default_tools() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::resolve(None, None, dir.path().join("models").to_str());
        let registry = ToolRegistry::with_default_tools(&config).unwrap();

        assert_eq!(registry.names(), vec!["browser", "models", "sequential-thinking"]);
        assert!(dir.path().join("models").exists());

        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 3);
        assert!(definitions.iter().all(|d| d.input_schema["type"] == "object"));
    }
}
