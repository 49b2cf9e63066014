//! OpenPower MCP Server — sequential thinking, browser automation, and model loading tools over HTTP.

pub mod agent;
pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::Dispatcher;
pub use tools::{Tool, ToolRegistry};
pub use transport::HttpTransport;
