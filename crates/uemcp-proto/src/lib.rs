//! uemcp Wire Protocol Types
//!
//! This crate defines the JSON shapes exchanged between the MCP-side client
//! and the editor-side bridge server:
//!
//! - **Request**: `{"type":"python_call","module":...,"function":...,"args":{...}}`
//! - **Response envelope**: `{"success":bool,"message"?,"result"?,"type"?,"traceback"?}`
//!
//! The protocol is deliberately double-encoded: the envelope carries
//! transport-level status, and `result` is itself a JSON string produced by
//! the action. Clients parse the envelope first and the inner payload
//! second; everything past the transport boundary works with structured
//! values.
//!
//! No I/O lives here. The transport halves are in `uemcp-bridge`.

pub mod envelope;
pub mod request;

pub use envelope::{ErrorKind, ResponseEnvelope};
pub use request::{Request, CALL_KIND};

/// Named-argument mapping carried by a request (`args`).
pub type ArgMap = serde_json::Map<String, serde_json::Value>;
