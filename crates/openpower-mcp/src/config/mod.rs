//! Configuration loading and resolution.

use std::path::PathBuf;
use std::time::Duration;

use openpower::{DEFAULT_HUB_ENDPOINT, DEFAULT_NAVIGATION_TIMEOUT_MS};

/// Default listen address of the tool server.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3100";

/// Default listen address of the agent-card server.
pub const DEFAULT_AGENT_ADDR: &str = "0.0.0.0:8080";

/// Default public URL advertised in the agent card.
pub const DEFAULT_AGENT_URL: &str = "http://localhost:8080";

/// Everything the tool server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub token: Option<String>,
    pub model_cache: PathBuf,
    pub hub_endpoint: String,
    pub chromium: Option<PathBuf>,
    pub navigation_timeout: Duration,
}

impl ServerConfig {
    /// Resolve the configuration from explicit CLI values and the environment.
    pub fn resolve(addr: Option<String>, token: Option<String>, model_cache: Option<&str>) -> Self {
        Self {
            addr: addr.unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            token: resolve_token(token),
            model_cache: resolve_model_cache(model_cache),
            hub_endpoint: resolve_hub_endpoint(),
            chromium: std::env::var("OPENPOWER_CHROMIUM_PATH").ok().map(PathBuf::from),
            navigation_timeout: resolve_navigation_timeout(),
        }
    }
}

/// Resolve the bearer token: CLI flag > `OPENPOWER_TOKEN`.
pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| std::env::var("OPENPOWER_TOKEN").ok())
        .filter(|t| !t.is_empty())
}

/// Resolve the model cache directory.
pub fn resolve_model_cache(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var("OPENPOWER_MODEL_CACHE") {
        return PathBuf::from(env_path);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".openpower")
        .join("models")
}

pub fn resolve_hub_endpoint() -> String {
    std::env::var("OPENPOWER_HUB_ENDPOINT").unwrap_or_else(|_| DEFAULT_HUB_ENDPOINT.to_string())
}

/// Page load timeout from `OPENPOWER_NAVIGATION_TIMEOUT_MS`, falling back to the default.
pub fn resolve_navigation_timeout() -> Duration {
    let ms = std::env::var("OPENPOWER_NAVIGATION_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_NAVIGATION_TIMEOUT_MS);
    Duration::from_millis(ms)
}
