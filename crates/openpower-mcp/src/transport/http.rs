//! HTTP transport — tool invocation, discovery, bearer auth, and /health.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::protocol::Dispatcher;
use crate::types::{DiscoveryDocument, McpError, McpResult, ToolListResult, SERVER_VERSION};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub token: Option<String>,
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP transport serving the tool endpoints.
pub struct HttpTransport {
    state: Arc<ServerState>,
}

impl HttpTransport {
    /// Require `Authorization: Bearer <token>` on tool and discovery routes.
    pub fn with_token(token: Option<String>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            state: Arc::new(ServerState { token, dispatcher }),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::InternalError(e.to_string()))?;

        Ok(())
    }
}

/// Build the router. `/health` bypasses authentication.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/.well-known/mcp.json", get(handle_discovery))
        .route("/tools", get(handle_tools_list))
        .route("/tools/:tool_name", post(handle_tool_call))
        .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Auth middleware — checks Bearer token if configured.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::warn!("Rejected unauthenticated request to {}", request.uri().path());
            return McpError::Unauthorized.into_response();
        }
    }

    next.run(request).await
}

/// Parse a request body into a JSON object. An empty body is an empty object.
fn parse_params(body: &[u8]) -> McpResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| McpError::ParseError(e.to_string()))?;

    if !value.is_object() {
        return Err(McpError::InvalidRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    Ok(value)
}

async fn handle_tool_call(
    State(state): State<Arc<ServerState>>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Result<AxumJson<Value>, McpError> {
    let params = parse_params(&body)?;
    let result = state.dispatcher.dispatch(&tool_name, params).await?;
    Ok(AxumJson(result))
}

async fn handle_discovery(State(state): State<Arc<ServerState>>) -> AxumJson<DiscoveryDocument> {
    AxumJson(state.dispatcher.discovery())
}

async fn handle_tools_list(State(state): State<Arc<ServerState>>) -> AxumJson<ToolListResult> {
    AxumJson(ToolListResult {
        tools: state.dispatcher.definitions(),
    })
}

/// Health check endpoint — no auth required.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    AxumJson(json!({
        "status": "ok",
        "version": SERVER_VERSION,
        "tools": state.dispatcher.registry().len(),
    }))
}
