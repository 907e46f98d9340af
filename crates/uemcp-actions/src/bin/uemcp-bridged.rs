//! Dev bridge server: serves the action catalogue against an in-memory
//! editor host, so the MCP layer and clients can be exercised end to end
//! without an engine.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use uemcp_actions::FakeEditorHost;
use uemcp_bridge::{BridgeServer, ServerConfig, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "uemcp-bridged", about = "uemcp dev bridge server (in-memory editor host)")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Per-connection read deadline in seconds.
    #[arg(long, default_value_t = 30)]
    read_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::default()
        .port(args.port)
        .read_timeout_secs(args.read_timeout_secs);
    config.host = args.host;

    let registry = uemcp_actions::registry(Arc::new(FakeEditorHost::new()));
    let server = BridgeServer::with_config(config, registry);
    server.bind().await?.run().await?;
    Ok(())
}
