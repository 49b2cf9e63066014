//! Tool: browser — Navigate to pages and capture screenshots.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use openpower::Browser;

use crate::types::{McpError, McpResult, ToolDefinition};

use super::Tool;

pub const NAME: &str = "browser";

#[derive(Debug, Deserialize)]
struct BrowserParams {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

pub struct BrowserTool {
    browser: Arc<dyn Browser>,
}

impl BrowserTool {
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Tool for BrowserTool {
    fn name(&self) -> &str {
        NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.to_string(),
            description: Some("Browser automation tool for web interactions".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["navigate", "screenshot"]
                    },
                    "url": { "type": "string" }
                },
                "required": ["action", "url"]
            }),
        }
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: BrowserParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let (action, url) = match (params.action, params.url) {
            (Some(action), Some(url)) if !action.is_empty() && !url.is_empty() => (action, url),
            _ => {
                return Err(McpError::InvalidParams(
                    "Action and URL are required".to_string(),
                ))
            }
        };

        match action.as_str() {
            "navigate" => {
                let title = self.browser.navigate(&url).await?;
                tracing::debug!("Navigated to {url}: {title:?}");
                Ok(json!({ "status": "success", "title": title }))
            }
            "screenshot" => {
                let png = self.browser.screenshot(&url).await?;
                tracing::debug!("Captured {} byte screenshot of {url}", png.len());
                Ok(json!({
                    "status": "success",
                    "screenshot": base64::engine::general_purpose::STANDARD.encode(&png),
                    "mime_type": "image/png"
                }))
            }
            other => Err(McpError::InvalidParams(format!(
                "Unsupported action: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpower::{OpenPowerError, OpenPowerResult};

    struct StaticBrowser;

    #[async_trait]
    impl Browser for StaticBrowser {
        async fn navigate(&self, url: &str) -> OpenPowerResult<String> {
            if url.contains("unreachable") {
                return Err(OpenPowerError::Browser("net::ERR_NAME_NOT_RESOLVED".into()));
            }
            Ok(format!("Title of {url}"))
        }

        async fn screenshot(&self, _url: &str) -> OpenPowerResult<Vec<u8>> {
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    fn tool() -> BrowserTool {
        BrowserTool::new(Arc::new(StaticBrowser))
    }

    #[tokio::test]
    async fn test_navigate_returns_title() {
        let result = tool()
            .execute(json!({ "action": "navigate", "url": "https://example.com" }))
            .await
            .unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["title"], "Title of https://example.com");
    }

    #[tokio::test]
    async fn test_screenshot_is_base64() {
        let result = tool()
            .execute(json!({ "action": "screenshot", "url": "https://example.com" }))
            .await
            .unwrap();
        assert_eq!(result["screenshot"], "iVBORw==");
        assert_eq!(result["mime_type"], "image/png");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let err = tool()
            .execute(json!({ "action": "navigate" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid params: Action and URL are required");

        let err = tool()
            .execute(json!({ "action": "", "url": "https://example.com" }))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_unsupported_action() {
        let err = tool()
            .execute(json!({ "action": "click", "url": "https://example.com" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid params: Unsupported action: click");
    }

    #[tokio::test]
    async fn test_browser_failure_propagates() {
        let err = tool()
            .execute(json!({ "action": "navigate", "url": "https://unreachable.invalid" }))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::Browser(_)));
    }
}
