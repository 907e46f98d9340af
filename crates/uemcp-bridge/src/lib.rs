//! uemcp Dispatch and Transport Core
//!
//! The bridge resolves `(module, function)` string pairs from incoming
//! requests to registered actions, executes them with named arguments, and
//! shuttles JSON envelopes over short-lived loopback TCP connections:
//!
//! ```text
//! MCP tool layer -> BridgeClient -> BridgeServer -> ActionRegistry -> invoke
//!                                       |                                |
//!                                       +---- ResponseEnvelope <---------+
//! ```
//!
//! One connection carries exactly one request/response pair. There is no
//! length prefix: each side writes its full message and half-closes, and
//! the peer reads until EOF. Action execution is funneled through a single
//! dedicated executor thread because editor APIs are main-thread-affine;
//! the socket layer itself accepts connections concurrently.
//!
//! Every enumerated failure is converted to a value-level envelope at the
//! boundary where it is detected; no error kind crosses the client/server
//! boundary as a transport fault.

pub mod client;
pub mod error;
pub mod invoke;
pub mod registry;
pub mod server;

pub use client::{BridgeClient, CallOutcome, ClientConfig};
pub use error::{CallError, DispatchError, ServerError};
pub use invoke::invoke;
pub use registry::{
    ActionFailure, ActionModule, ActionOutput, ActionRegistry, ActionResult, ModuleProvider,
    StaticModules,
};
pub use server::{BoundBridge, BridgeServer, ServerConfig, DEFAULT_PORT};

/// Truncates to at most `max_chars` characters, on a char boundary.
///
/// Used wherever misbehaving peers' bytes are echoed into diagnostics.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
