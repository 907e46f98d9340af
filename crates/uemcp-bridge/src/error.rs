//! Error types for the dispatch and transport core.

use thiserror::Error;
use uemcp_proto::ErrorKind;

/// Errors raised while resolving a `(module, function)` pair.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The module name contained path-escape characters. Rejected before
    /// any lookup, independent of whether such a module exists.
    #[error("Invalid module name: {module}. Contains restricted characters.")]
    InvalidModuleName { module: String },

    /// No module of this name is registered. Lookup is case-sensitive.
    #[error("Could not resolve module '{module}'. Ensure it is registered with the bridge.")]
    ModuleNotFound { module: String },

    /// The module resolved but the action name is absent.
    #[error("Function '{function}' not found in module '{module}'.")]
    FunctionNotFound { module: String, function: String },
}

impl DispatchError {
    /// The normalized envelope classification for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InvalidModuleName { .. } => ErrorKind::InvalidModuleName,
            DispatchError::ModuleNotFound { .. } => ErrorKind::ModuleNotFound,
            DispatchError::FunctionNotFound { .. } => ErrorKind::FunctionNotFound,
        }
    }
}

/// Fatal errors from the transport server.
///
/// Per-connection faults (bad JSON, oversize requests, stalled reads) are
/// handled inside the connection task and never surface here.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listening socket.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Could not spawn the dedicated action-executor thread.
    #[error("Failed to spawn executor thread: {0}")]
    ExecutorSpawn(#[source] std::io::Error),
}

/// Errors surfaced by the transport client.
///
/// Each variant implies a different remediation: `Refused` means the editor
/// bridge is not running, `Timeout` points at latency or a stalled action,
/// and `Decode` means the editor produced non-conforming bytes.
#[derive(Debug, Error)]
pub enum CallError {
    /// No listener at the configured endpoint.
    #[error("Connection refused ({addr}). Ensure the editor bridge TCP server is active.")]
    Refused { addr: String },

    /// No complete response within the configured deadline.
    #[error("Socket timeout ({addr}): no response from the editor within {timeout_secs}s.")]
    Timeout { addr: String, timeout_secs: u64 },

    /// The peer closed without sending any bytes.
    #[error("No response received from the editor ({addr}).")]
    EmptyResponse { addr: String },

    /// The response exceeded the client's size cap.
    #[error("Response from the editor exceeded {max_bytes} bytes.")]
    ResponseTooLarge { max_bytes: usize },

    /// The outer response bytes were not valid JSON.
    #[error("Failed to decode response JSON from the editor: {source}. Raw response: '{raw}'")]
    Decode {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be serialized.
    #[error("Failed to encode request JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// Any other socket-level failure.
    #[error("Socket error ({addr}): {source}")]
    Io {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The editor answered with a `success: false` envelope.
    #[error("{message}")]
    Action {
        message: String,
        error_type: Option<String>,
        traceback: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_errors_map_to_taxonomy_kinds() {
        let err = DispatchError::InvalidModuleName {
            module: "../../etc".to_string(),
        };
        assert_eq!(err.kind().wire_name(), "ValueError");

        let err = DispatchError::ModuleNotFound {
            module: "ghost_actions".to_string(),
        };
        assert_eq!(err.kind().wire_name(), "ModuleNotFoundError");

        let err = DispatchError::FunctionNotFound {
            module: "actor_actions".to_string(),
            function: "ue_vanish".to_string(),
        };
        assert_eq!(err.kind().wire_name(), "FunctionNotFoundError");
    }

    #[test]
    fn refused_error_message_mentions_refused() {
        let err = CallError::Refused {
            addr: "127.0.0.1:12029".to_string(),
        };
        assert!(err.to_string().contains("refused"));
    }
}
