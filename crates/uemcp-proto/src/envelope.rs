//! Response envelope and the normalized error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized error kinds reported in the envelope `type` field.
///
/// `ActionRuntimeError` is a catch-all classification: the wire `type` for
/// a failed action carries the action's own error type name, so the
/// enumeration here covers the kinds produced by the dispatch core itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Requested namespace unknown.
    ModuleNotFound,
    /// Namespace name contained path-escape characters.
    InvalidModuleName,
    /// Namespace resolved but the action name is absent.
    FunctionNotFound,
    /// Action returned a non-string (non-UTF-8) value.
    InvalidReturnType,
    /// Action returned a string that is not valid JSON.
    InvalidReturnFormat,
    /// The action itself failed during execution.
    ActionRuntimeError,
    /// Inbound request bytes were not valid JSON.
    RequestDecodeError,
}

impl ErrorKind {
    /// Wire name written into the envelope `type` field.
    ///
    /// `InvalidModuleName` reports as `ValueError`, matching the behavior
    /// editor-side listeners already expose for path-escaping module names.
    pub fn wire_name(self) -> &'static str {
        match self {
            ErrorKind::ModuleNotFound => "ModuleNotFoundError",
            ErrorKind::InvalidModuleName => "ValueError",
            ErrorKind::FunctionNotFound => "FunctionNotFoundError",
            ErrorKind::InvalidReturnType => "InvalidReturnType",
            ErrorKind::InvalidReturnFormat => "InvalidReturnFormat",
            ErrorKind::ActionRuntimeError => "ActionRuntimeError",
            ErrorKind::RequestDecodeError => "RequestDecodeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Outer transport-level response.
///
/// `result`, when present, is itself a JSON-encoded string (the action's
/// serialized payload). The double encoding is preserved on the wire;
/// clients decode it at the transport boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the call succeeded end to end.
    pub success: bool,
    /// Human-readable status or error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The action's own JSON payload, still encoded as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Error classification (error type name) for failures.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Formatted error chain for failures, when one is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl ResponseEnvelope {
    /// Successful call carrying the action's serialized payload.
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            message: None,
            result: Some(result.into()),
            error_type: None,
            traceback: None,
        }
    }

    /// Failure with a normalized kind.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            result: None,
            error_type: Some(kind.wire_name().to_string()),
            traceback: None,
        }
    }

    /// Failure carrying the failing error's own type name and error chain.
    pub fn action_failure(
        error_type: impl Into<String>,
        message: impl Into<String>,
        traceback: Option<String>,
    ) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            result: None,
            error_type: Some(error_type.into()),
            traceback,
        }
    }

    /// Attaches an error chain to a failure envelope.
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok_envelope_omits_error_fields() {
        let env = ResponseEnvelope::ok(r#"{"success":true}"#);
        let value = serde_json::to_value(&env).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["result"], r#"{"success":true}"#);
        assert!(value.get("message").is_none());
        assert!(value.get("type").is_none());
        assert!(value.get("traceback").is_none());
    }

    #[test]
    fn failure_envelope_writes_wire_type() {
        let env = ResponseEnvelope::failure(
            ErrorKind::FunctionNotFound,
            "Function 'nope' not found in module 'actor_actions'.",
        );
        let value = serde_json::to_value(&env).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["type"], "FunctionNotFoundError");
    }

    #[test]
    fn path_escape_kind_reports_value_error() {
        assert_eq!(ErrorKind::InvalidModuleName.wire_name(), "ValueError");
    }

    #[test]
    fn envelope_round_trips_with_traceback() {
        let env = ResponseEnvelope::action_failure(
            "ActorNotFound",
            "No actor labeled 'Cube_7'.",
            Some("ActorNotFound: No actor labeled 'Cube_7'.".to_string()),
        );
        let encoded = serde_json::to_string(&env).unwrap();
        let decoded: ResponseEnvelope = serde_json::from_str(&encoded).unwrap();
        assert_eq!(env, decoded);
    }
}
