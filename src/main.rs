mod calendly;
mod config;
mod error;
mod format;
mod mcp;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, USER_AGENT};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use calendly::CalendlyClient;
use config::Config;
use mcp::ToolContext;

#[derive(Parser)]
#[command(name = "calendly-mcp", about = "MCP server for the Calendly scheduling API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Stdio,

    /// Serve MCP over streamable HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port to bind (overrides MCP_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // stdout carries the protocol in stdio mode, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    let ctx = build_context(&config);

    match cli.command.unwrap_or(Commands::Stdio) {
        Commands::Stdio => run_stdio(ctx).await,
        Commands::Serve { host, port } => {
            let addr = SocketAddr::new(host, port.unwrap_or(config.mcp_port));
            run_http(ctx, addr, config.auth_token).await
        }
    }
}

fn build_context(config: &Config) -> ToolContext {
    let client = CalendlyClient::with_base_url(config.api_key.clone(), config.api_base.clone())
        .with_header(
            USER_AGENT,
            HeaderValue::from_static(concat!("calendly-mcp/", env!("CARGO_PKG_VERSION"))),
        );
    tracing::info!(base_url = client.base_url(), "Using Calendly API");
    ToolContext::new(Arc::new(client))
}

async fn run_stdio(ctx: ToolContext) -> anyhow::Result<()> {
    tracing::info!(
        "Calendly MCP server v{} running on stdio",
        env!("CARGO_PKG_VERSION")
    );
    mcp::stdio::run(&ctx).await?;
    Ok(())
}

async fn run_http(ctx: ToolContext, addr: SocketAddr, auth_token: Option<String>) -> anyhow::Result<()> {
    if auth_token.is_none() {
        tracing::warn!("MCP_AUTH_TOKEN is not set; /mcp accepts unauthenticated requests");
    }
    let app = mcp::router(ctx, auth_token);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "MCP server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
