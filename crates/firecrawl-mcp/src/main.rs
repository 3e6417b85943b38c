//! Firecrawl MCP Server — entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use firecrawl_mcp::config::{build_client, ServerOptions};
use firecrawl_mcp::protocol::ProtocolHandler;
use firecrawl_mcp::tools::ToolRegistry;
use firecrawl_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "firecrawl-mcp",
    about = "MCP server for Firecrawl — web scraping, crawling, search and extraction for LLMs",
    version
)]
struct Cli {
    /// Firecrawl API key. Also reads FIRECRAWL_API_KEY.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Firecrawl API base URL. Also reads FIRECRAWL_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds. Also reads FIRECRAWL_TIMEOUT_SECS.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn server_options(&self) -> ServerOptions {
        ServerOptions {
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP.
    #[cfg(feature = "sse")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:3100")]
        addr: String,

        /// Bearer token for authentication.
        /// Also reads from FIRECRAWL_MCP_TOKEN env var.
        #[arg(long)]
        token: Option<String>,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   firecrawl-mcp completions bash > ~/.local/share/bash-completion/completions/firecrawl-mcp
    ///   firecrawl-mcp completions zsh > ~/.zfunc/_firecrawl-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
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

    let options = cli.server_options();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let client = build_client(&options)?;
            let handler = ProtocolHandler::new(Arc::new(client));
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "sse")]
        Commands::ServeHttp { addr, token } => {
            use firecrawl_mcp::config::resolve_token;
            use firecrawl_mcp::transport::sse::SseTransport;

            let client = build_client(&options)?;
            let effective_token = resolve_token(token.as_deref());

            tracing::info!("Firecrawl MCP server (HTTP)");
            if effective_token.is_some() {
                tracing::info!("Auth: bearer token required");
            }

            let handler = ProtocolHandler::new(Arc::new(client));
            let transport = SseTransport::new(handler, effective_token);
            transport.run(&addr).await?;
        }

        Commands::Info => {
            let capabilities = firecrawl_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "firecrawl-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let client = match build_client(&options) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!("{e}; remote commands are disabled");
                    None
                }
            };
            firecrawl_mcp::repl::run(client).await?;
        }
    }

    Ok(())
}
