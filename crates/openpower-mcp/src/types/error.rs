//! Error types, error codes, and their HTTP mapping for the tool server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

use openpower::OpenPowerError;

/// Standard JSON-RPC 2.0 error codes, reused in HTTP error bodies.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const REFERENCE_OUT_OF_RANGE: i32 = -32850;
    pub const BROWSER_ERROR: i32 = -32851;
    pub const MODEL_ERROR: i32 = -32852;

    /// Server: Unauthorized (missing or invalid bearer token).
    pub const UNAUTHORIZED: i32 = -32900;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tool {0} not found")]
    ToolNotFound(String),

    #[error("Reference out of range: {0}")]
    ReferenceOutOfRange(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unauthorized — missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::Io(_) | McpError::Json(_) => INTERNAL_ERROR,
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::ReferenceOutOfRange(_) => REFERENCE_OUT_OF_RANGE,
            McpError::Browser(_) => BROWSER_ERROR,
            McpError::Model(_) => MODEL_ERROR,
            McpError::Unauthorized => UNAUTHORIZED,
        }
    }

    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            McpError::ParseError(_) | McpError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            McpError::InvalidParams(_) => StatusCode::UNPROCESSABLE_ENTITY,
            McpError::ToolNotFound(_) => StatusCode::NOT_FOUND,
            McpError::Unauthorized => StatusCode::UNAUTHORIZED,
            McpError::Browser(_) | McpError::Model(_) => StatusCode::BAD_GATEWAY,
            McpError::ReferenceOutOfRange(_)
            | McpError::InternalError(_)
            | McpError::Io(_)
            | McpError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_body(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        })
    }
}

impl IntoResponse for McpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_error_body())).into_response()
    }
}

impl From<OpenPowerError> for McpError {
    fn from(e: OpenPowerError) -> Self {
        match e {
            OpenPowerError::InvalidThought(msg) => McpError::InvalidParams(msg),
            e @ OpenPowerError::ReferenceOutOfRange { .. } => {
                McpError::ReferenceOutOfRange(e.to_string())
            }
            e @ OpenPowerError::InvalidModelId(_) => McpError::InvalidParams(e.to_string()),
            OpenPowerError::Browser(msg) => McpError::Browser(msg),
            OpenPowerError::Model(msg) => McpError::Model(msg),
            OpenPowerError::Io(e) => McpError::Io(e),
            OpenPowerError::Json(e) => McpError::InvalidParams(e.to_string()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_tool() {
        let err = McpError::ToolNotFound("telepathy".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let body = err.to_error_body();
        assert_eq!(body["error"]["code"], mcp_error_codes::TOOL_NOT_FOUND);
        assert_eq!(body["error"]["message"], "Tool telepathy not found");
    }

    #[test]
    fn test_core_errors_map_to_statuses() {
        let invalid: McpError = OpenPowerError::InvalidThought("missing field".into()).into();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let range: McpError = OpenPowerError::ReferenceOutOfRange {
            field: "revises_thought",
            position: 9,
            len: 2,
        }
        .into();
        assert_eq!(range.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(range.to_string().contains("revises_thought refers to thought 9"));

        let model_id: McpError = OpenPowerError::InvalidModelId("/etc/x".into()).into();
        assert_eq!(model_id.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let browser: McpError = OpenPowerError::Browser("crashed".into()).into();
        assert_eq!(browser.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(browser.code(), mcp_error_codes::BROWSER_ERROR);
    }

    #[test]
    fn test_unauthorized() {
        assert_eq!(McpError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(McpError::Unauthorized.code(), -32900);
    }
}
