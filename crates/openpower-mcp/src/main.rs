//! OpenPower MCP Server — entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use openpower_mcp::agent::{AgentCard, AgentServer};
use openpower_mcp::config::{ServerConfig, DEFAULT_AGENT_ADDR, DEFAULT_AGENT_URL};
use openpower_mcp::protocol::Dispatcher;
use openpower_mcp::tools::ToolRegistry;
use openpower_mcp::transport::HttpTransport;

#[derive(Parser)]
#[command(
    name = "openpower-mcp",
    about = "OpenPower MCP server — sequential thinking, browser automation, and model loading tools",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tool server over HTTP (default).
    Serve {
        /// Listen address (host:port).
        #[arg(long)]
        addr: Option<String>,

        /// Bearer token for authentication.
        /// Also reads from OPENPOWER_TOKEN env var.
        #[arg(long)]
        token: Option<String>,

        /// Model cache directory.
        /// Also reads from OPENPOWER_MODEL_CACHE env var.
        #[arg(long)]
        model_cache: Option<String>,
    },

    /// Start the agent-card server.
    ServeAgent {
        /// Listen address (host:port).
        #[arg(long, default_value = DEFAULT_AGENT_ADDR)]
        addr: String,

        /// Public URL advertised in the agent card.
        #[arg(long, default_value = DEFAULT_AGENT_URL)]
        url: String,
    },

    /// Print the discovery document and tool definitions as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   openpower-mcp completions bash > ~/.local/share/bash-completion/completions/openpower-mcp
    ///   openpower-mcp completions zsh > ~/.zfunc/_openpower-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        addr: None,
        token: None,
        model_cache: None,
    }) {
        Commands::Serve {
            addr,
            token,
            model_cache,
        } => {
            let config = ServerConfig::resolve(addr, token, model_cache.as_deref());
            let registry = ToolRegistry::with_default_tools(&config)?;

            tracing::info!("OpenPower MCP server");
            tracing::info!("Tools: {}", registry.names().join(", "));
            tracing::info!("Model cache: {}", config.model_cache.display());
            if config.token.is_some() {
                tracing::info!("Auth: bearer token required");
            }

            let dispatcher = Arc::new(Dispatcher::new(registry));
            let transport = HttpTransport::with_token(config.token.clone(), dispatcher);
            transport.run(&config.addr).await?;
        }

        Commands::ServeAgent { addr, url } => {
            let config = ServerConfig::resolve(None, None, None);
            let registry = ToolRegistry::with_default_tools(&config)?;

            tracing::info!("OpenPower agent server");
            tracing::info!("Advertised MCP tools: {}", registry.names().join(", "));

            let card = AgentCard::openpower(&url).with_mcp_tools(registry.names());
            let server = AgentServer::new(card);
            server.run(&addr).await?;
        }

        Commands::Info => {
            let config = ServerConfig::resolve(None, None, None);
            let dispatcher = Dispatcher::new(ToolRegistry::with_default_tools(&config)?);
            let info = serde_json::json!({
                "discovery": dispatcher.discovery(),
                "tools": dispatcher.definitions(),
                "tool_count": dispatcher.registry().len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "openpower-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}
