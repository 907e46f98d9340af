//! Transport server: accepts one loopback TCP connection per request,
//! reads a full message, dispatches it, writes one framed response, closes.
//!
//! Framing relies on half-close: the client writes its request and shuts
//! down its write half, the server reads to EOF, writes the response, and
//! closes. Suitable for same-host single-shot traffic; pipelining is
//! deliberately unsupported.
//!
//! The accept loop holds any number of connections, but every action
//! executes on one dedicated executor thread that owns the registry.
//! Editor APIs are main-thread-affine; the funnel preserves that affinity
//! no matter how many sockets are open.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use uemcp_proto::{ErrorKind, Request, ResponseEnvelope};

use crate::error::ServerError;
use crate::invoke::invoke;
use crate::registry::ActionRegistry;

/// Default port for the bridge server.
pub const DEFAULT_PORT: u16 = 12029;

/// Default deadline for reading one request off a connection.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Default cap on inbound request size.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Requests queued for the executor before accept tasks start waiting.
const EXECUTOR_QUEUE_DEPTH: usize = 64;

/// Configuration for the transport server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind. Loopback unless you know what you are doing.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Deadline for reading one complete request.
    pub read_timeout: Duration,
    /// Cap on inbound request size; oversize requests fail their
    /// connection only.
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl ServerConfig {
    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the read deadline in seconds.
    pub fn read_timeout_secs(mut self, secs: u64) -> Self {
        self.read_timeout = Duration::from_secs(secs);
        self
    }

    /// Sets the inbound size cap.
    pub fn max_request_bytes(mut self, bytes: usize) -> Self {
        self.max_request_bytes = bytes;
        self
    }
}

struct ExecJob {
    request: Request,
    reply: oneshot::Sender<ResponseEnvelope>,
}

/// The bridge transport server, not yet bound.
pub struct BridgeServer {
    config: ServerConfig,
    registry: ActionRegistry,
}

impl BridgeServer {
    /// Creates a server with default configuration.
    pub fn new(registry: ActionRegistry) -> Self {
        Self {
            config: ServerConfig::default(),
            registry,
        }
    }

    /// Creates a server with the given configuration.
    pub fn with_config(config: ServerConfig, registry: ActionRegistry) -> Self {
        Self { config, registry }
    }

    /// Binds the listener and starts the executor thread.
    ///
    /// Binding is separate from serving so callers (and tests) can learn
    /// the bound address before the accept loop starts.
    pub async fn bind(self) -> Result<BoundBridge, ServerError> {
        let addr = SocketAddr::new(self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_string(),
                source: e,
            })?;
        let local_addr = listener.local_addr().map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;

        let (exec_tx, mut exec_rx) = mpsc::channel::<ExecJob>(EXECUTOR_QUEUE_DEPTH);
        let registry = self.registry;
        std::thread::Builder::new()
            .name("uemcp-executor".to_string())
            .spawn(move || {
                while let Some(job) = exec_rx.blocking_recv() {
                    let response = invoke(&registry, &job.request);
                    // A closed reply channel means the connection task gave
                    // up (client vanished); drop the orphaned response.
                    let _ = job.reply.send(response);
                }
            })
            .map_err(ServerError::ExecutorSpawn)?;

        info!(%local_addr, "bridge server listening");

        Ok(BoundBridge {
            config: self.config,
            listener,
            local_addr,
            exec_tx,
        })
    }
}

/// A bound server ready to accept connections.
pub struct BoundBridge {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    exec_tx: mpsc::Sender<ExecJob>,
}

impl BoundBridge {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until Ctrl+C.
    pub async fn run(self) -> Result<(), ServerError> {
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("shutting down");
                let _ = shutdown_tx.send(());
            }
        });
        self.run_with_shutdown(shutdown_rx).await
    }

    /// Serves until the shutdown channel fires.
    pub async fn run_with_shutdown(
        self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr)) => {
                            debug!(%peer_addr, "connection accepted");
                            let exec_tx = self.exec_tx.clone();
                            let config = self.config.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, peer_addr, exec_tx, config).await;
                            });
                        }
                        Err(e) => {
                            // Transient accept failures must not kill the
                            // server.
                            warn!(error = %e, "accept error");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("server shutdown complete");
                    return Ok(());
                }
            }
        }
    }
}

/// Handles one connection: read to EOF, dispatch, write, close.
async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    exec_tx: mpsc::Sender<ExecJob>,
    config: ServerConfig,
) {
    let bytes = match read_request(&mut stream, &config).await {
        Ok(bytes) => bytes,
        Err(ReadError::TooLarge) => {
            let envelope = ResponseEnvelope::failure(
                ErrorKind::RequestDecodeError,
                format!(
                    "Request exceeds the maximum size of {} bytes.",
                    config.max_request_bytes
                ),
            );
            write_envelope(&mut stream, &envelope, peer_addr).await;
            return;
        }
        Err(ReadError::Timeout) => {
            // The peer stalled; it is not listening for a diagnosis.
            warn!(%peer_addr, "read deadline elapsed, dropping connection");
            return;
        }
        Err(ReadError::Io(e)) => {
            warn!(%peer_addr, error = %e, "read error");
            return;
        }
    };

    let request: Request = match serde_json::from_slice(&bytes) {
        Ok(request) => request,
        Err(e) => {
            // Fatal to this connection only; the error still goes back as
            // a payload-level envelope.
            let envelope = ResponseEnvelope::failure(
                ErrorKind::RequestDecodeError,
                format!("Failed to decode request JSON: {e}"),
            );
            write_envelope(&mut stream, &envelope, peer_addr).await;
            return;
        }
    };

    debug!(%peer_addr, module = %request.module, function = %request.function, "dispatching");

    let (reply_tx, reply_rx) = oneshot::channel();
    let job = ExecJob {
        request,
        reply: reply_tx,
    };
    if exec_tx.send(job).await.is_err() {
        warn!(%peer_addr, "executor unavailable");
        return;
    }

    let envelope = match reply_rx.await {
        Ok(envelope) => envelope,
        Err(_) => {
            warn!(%peer_addr, "executor dropped the reply");
            return;
        }
    };

    write_envelope(&mut stream, &envelope, peer_addr).await;
}

enum ReadError {
    TooLarge,
    Timeout,
    Io(std::io::Error),
}

/// Reads until the peer half-closes, bounded by the configured deadline
/// and size cap.
async fn read_request(stream: &mut TcpStream, config: &ServerConfig) -> Result<Vec<u8>, ReadError> {
    let read_all = async {
        let mut buf = Vec::new();
        loop {
            let n = stream.read_buf(&mut buf).await.map_err(ReadError::Io)?;
            if n == 0 {
                return Ok(buf);
            }
            if buf.len() > config.max_request_bytes {
                return Err(ReadError::TooLarge);
            }
        }
    };
    match tokio::time::timeout(config.read_timeout, read_all).await {
        Ok(result) => result,
        Err(_) => Err(ReadError::Timeout),
    }
}

async fn write_envelope(stream: &mut TcpStream, envelope: &ResponseEnvelope, peer_addr: SocketAddr) {
    let bytes = serde_json::to_vec(envelope).unwrap_or_else(|_| {
        br#"{"success":false,"message":"Failed to serialize response"}"#.to_vec()
    });
    if let Err(e) = stream.write_all(&bytes).await {
        warn!(%peer_addr, error = %e, "send error");
        return;
    }
    // Half-close signals end-of-message to the reading peer.
    let _ = stream.shutdown().await;
    debug!(%peer_addr, "connection closed");
}
