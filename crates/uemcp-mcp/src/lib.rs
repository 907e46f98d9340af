//! MCP server for the uemcp editor bridge.
//!
//! Exposes the editor action catalogue as MCP tools over stdio. Each tool
//! serializes its parameters into the bridge's named-argument mapping and
//! round-trips through the TCP transport client; the editor does the actual
//! work.

pub mod tools;
