//! HTTP surface for the agent card, message intake, and the browser stream socket.

use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::{Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::types::{McpError, McpResult};

use super::AgentCard;

pub struct AgentServer {
    card: Arc<AgentCard>,
}

impl AgentServer {
    pub fn new(card: AgentCard) -> Self {
        Self {
            card: Arc::new(card),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/.well-known/agent.json", get(handle_agent_card))
            .route("/message/send", post(handle_message_send))
            .route("/browser/stream", get(handle_browser_stream))
            .layer(cors)
            .with_state(self.card.clone())
    }

    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("Agent server listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::InternalError(e.to_string()))?;

        Ok(())
    }
}

async fn handle_agent_card(State(card): State<Arc<AgentCard>>) -> AxumJson<AgentCard> {
    AxumJson(card.as_ref().clone())
}

/// Accepts agent messages. Nothing is processed yet; the reply is `null`.
async fn handle_message_send(AxumJson(message): AxumJson<Value>) -> McpResult<AxumJson<Value>> {
    if !message.is_object() {
        return Err(McpError::InvalidRequest(
            "Message must be a JSON object".to_string(),
        ));
    }

    tracing::info!("Received agent message: {message}");
    Ok(AxumJson(Value::Null))
}

async fn handle_browser_stream(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(browser_stream)
}

async fn browser_stream(mut socket: WebSocket) {
    tracing::info!("Browser stream connected");

    while let Some(frame) = socket.recv().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(Message::Text(text)) => tracing::debug!("Browser stream frame: {text}"),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Browser stream error: {e}");
                break;
            }
        }
    }

    tracing::info!("Browser stream closed");
}
