//! Agent-card server — publishes an agent descriptor alongside stub messaging endpoints.

pub mod card;
pub mod server;

pub use card::AgentCard;
pub use server::AgentServer;
