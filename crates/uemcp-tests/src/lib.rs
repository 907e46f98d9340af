//! Shared fixtures for the end-to-end bridge tests.
//!
//! Each test boots a real bridge server on an ephemeral loopback port,
//! backed by the in-memory editor host, and talks to it through the real
//! transport client. Dropping the returned shutdown handle stops the
//! server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use uemcp_actions::FakeEditorHost;
use uemcp_bridge::{ActionRegistry, BridgeClient, BridgeServer, ClientConfig, ServerConfig};

/// A running bridge and the means to reach and stop it.
pub struct TestBridge {
    pub addr: SocketAddr,
    shutdown: broadcast::Sender<()>,
}

impl TestBridge {
    /// Boots a bridge serving the given registry on an ephemeral port.
    pub async fn start(registry: ActionRegistry) -> Self {
        Self::start_with_config(ServerConfig::default().port(0), registry).await
    }

    /// Boots a bridge with explicit server configuration. The configured
    /// port is honored, so pass port 0 unless a fixed one is wanted.
    pub async fn start_with_config(config: ServerConfig, registry: ActionRegistry) -> Self {
        let bound = BridgeServer::with_config(config, registry)
            .bind()
            .await
            .expect("bind test bridge");
        let addr = bound.local_addr();
        let (shutdown, rx) = broadcast::channel(1);
        tokio::spawn(async move {
            let _ = bound.run_with_shutdown(rx).await;
        });
        Self { addr, shutdown }
    }

    /// Boots a bridge serving the full catalogue against a fresh fake host.
    pub async fn with_fake_editor() -> Self {
        Self::start(uemcp_actions::registry(Arc::new(FakeEditorHost::new()))).await
    }

    /// A client pointed at this bridge.
    pub fn client(&self) -> BridgeClient {
        let config = ClientConfig::default()
            .host(self.addr.ip().to_string())
            .port(self.addr.port())
            .timeout_secs(10);
        BridgeClient::with_config(config)
    }

    /// Sends raw bytes with half-close framing and reads the raw reply.
    pub async fn raw_exchange(&self, payload: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).await.expect("connect");
        stream.write_all(payload).await.expect("send");
        stream.shutdown().await.expect("half-close");
        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.expect("read reply");
        reply
    }
}

impl Drop for TestBridge {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
    }
}
