use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use uemcp_bridge::{BridgeClient, ClientConfig};
use uemcp_mcp::tools::UnrealMcp;

#[derive(Parser)]
#[command(name = "uemcp-mcp", about = "MCP server for Unreal editor automation via the uemcp bridge")]
struct Args {
    /// Host of the editor bridge TCP server
    #[arg(long, default_value = "127.0.0.1")]
    bridge_host: String,

    /// Port of the editor bridge TCP server
    #[arg(long, default_value_t = uemcp_bridge::DEFAULT_PORT)]
    bridge_port: u16,

    /// Per-call deadline in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP transport; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::default()
        .host(args.bridge_host)
        .port(args.bridge_port)
        .timeout_secs(args.timeout_secs);

    let service = UnrealMcp::new(BridgeClient::with_config(config))
        .serve(rmcp::transport::io::stdio())
        .await?;
    service.waiting().await?;
    Ok(())
}
