//! Transport client: one short-lived connection per call.
//!
//! Serializes a request, connects, sends, half-closes, reads the response
//! to EOF, and decodes both layers of the envelope. The double-encoded
//! `result` string is parsed here, at the transport boundary, so callers
//! work with structured values.

use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use uemcp_proto::{ArgMap, Request, ResponseEnvelope};

use crate::error::CallError;
use crate::server::DEFAULT_PORT;
use crate::truncate_chars;

/// Default connect/read deadline for one call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on response size.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// How much raw text a decode error echoes back.
const RAW_SNIPPET_LEN: usize = 400;

/// Configuration for the transport client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bridge server host.
    pub host: String,
    /// Bridge server port.
    pub port: u16,
    /// Deadline covering connect, send, and read for one call.
    pub timeout: Duration,
    /// Cap on response size.
    pub max_response_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl ClientConfig {
    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the deadline in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Decoded outcome of a successful call.
///
/// `data` is the action's payload parsed into a structured value. When the
/// payload was not valid JSON the call still counts as succeeded, since
/// the envelope said so, and the raw text is surfaced under `raw_result`
/// instead of being dropped or treated as a hard failure.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    /// Transport-level status message, when the server sent one.
    pub message: Option<String>,
    /// The action's payload, when it parsed as JSON.
    pub data: Option<Value>,
    /// The action's payload verbatim, when it did not parse.
    pub raw_result: Option<String>,
}

impl CallOutcome {
    /// Collapses the outcome into one JSON value for presentation layers.
    pub fn into_json(self) -> Value {
        if let Some(data) = self.data {
            return data;
        }
        let mut obj = serde_json::Map::new();
        obj.insert("success".into(), Value::Bool(true));
        if let Some(raw) = self.raw_result {
            obj.insert("raw_result".into(), Value::String(raw));
        }
        if let Some(message) = self.message {
            obj.insert("message".into(), Value::String(message));
        }
        Value::Object(obj)
    }
}

/// Client half of the bridge protocol.
#[derive(Debug, Clone, Default)]
pub struct BridgeClient {
    config: ClientConfig,
}

impl BridgeClient {
    /// Creates a client with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client with the given configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn addr(&self) -> String {
        // Bare IPv6 literals need brackets to dial.
        match self.config.host.parse::<std::net::IpAddr>() {
            Ok(std::net::IpAddr::V6(v6)) => format!("[{v6}]:{}", self.config.port),
            _ => format!("{}:{}", self.config.host, self.config.port),
        }
    }

    /// Calls `(module, function)` with named arguments.
    pub async fn call(
        &self,
        module: &str,
        function: &str,
        args: ArgMap,
    ) -> Result<CallOutcome, CallError> {
        self.send(&Request::call(module, function, args)).await
    }

    /// Sends a prebuilt request and decodes the response.
    pub async fn send(&self, request: &Request) -> Result<CallOutcome, CallError> {
        let payload = serde_json::to_vec(request).map_err(CallError::Encode)?;
        let addr = self.addr();
        debug!(%addr, module = %request.module, function = %request.function, "sending request");

        let exchange = self.exchange(&addr, &payload);
        let bytes = match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(CallError::Timeout {
                    addr,
                    timeout_secs: self.config.timeout.as_secs(),
                })
            }
        };

        if bytes.is_empty() {
            return Err(CallError::EmptyResponse { addr });
        }
        if bytes.len() > self.config.max_response_bytes {
            return Err(CallError::ResponseTooLarge {
                max_bytes: self.config.max_response_bytes,
            });
        }

        decode_outcome(&bytes)
    }

    /// Connect, write, half-close, read to EOF. Deadline applied by the
    /// caller.
    async fn exchange(&self, addr: &str, payload: &[u8]) -> Result<Vec<u8>, CallError> {
        let mut stream = TcpStream::connect(addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                CallError::Refused {
                    addr: addr.to_string(),
                }
            } else {
                CallError::Io {
                    addr: addr.to_string(),
                    source: e,
                }
            }
        })?;

        let io_err = |e: std::io::Error| CallError::Io {
            addr: addr.to_string(),
            source: e,
        };

        stream.write_all(payload).await.map_err(io_err)?;
        // Signal end-of-message; the server reads until EOF.
        stream.shutdown().await.map_err(io_err)?;

        let mut buf = Vec::new();
        // One byte past the cap so a response of exactly the cap is
        // distinguishable from a truncated one.
        let cap = self.config.max_response_bytes as u64 + 1;
        stream
            .take(cap)
            .read_to_end(&mut buf)
            .await
            .map_err(io_err)?;
        Ok(buf)
    }
}

/// Decodes the outer envelope, then the nested payload.
fn decode_outcome(bytes: &[u8]) -> Result<CallOutcome, CallError> {
    let envelope: ResponseEnvelope = serde_json::from_slice(bytes).map_err(|e| {
        let raw = String::from_utf8_lossy(bytes);
        CallError::Decode {
            raw: truncate_chars(&raw, RAW_SNIPPET_LEN).to_string(),
            source: e,
        }
    })?;

    if !envelope.success {
        return Err(CallError::Action {
            message: envelope
                .message
                .unwrap_or_else(|| "Unknown error from editor action.".to_string()),
            error_type: envelope.error_type,
            traceback: envelope.traceback,
        });
    }

    let outcome = match envelope.result {
        None => CallOutcome {
            message: envelope.message,
            data: None,
            raw_result: None,
        },
        Some(result) => match serde_json::from_str::<Value>(&result) {
            Ok(data) => CallOutcome {
                message: envelope.message,
                data: Some(data),
                raw_result: None,
            },
            // The outer call genuinely succeeded; a non-conforming inner
            // payload degrades to raw text instead of failing the call.
            Err(_) => CallOutcome {
                message: envelope.message,
                data: None,
                raw_result: Some(result),
            },
        },
    };
    Ok(outcome)
}
