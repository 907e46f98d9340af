//! Request message sent from the client to the bridge server.

use serde::{Deserialize, Serialize};

use crate::ArgMap;

/// Request kind for a dispatched action call.
///
/// The wire value is kept for compatibility with existing editor-side
/// listeners; it is the only kind this implementation dispatches.
pub const CALL_KIND: &str = "python_call";

/// One action-call request.
///
/// Constructed fresh per call; lives for exactly one round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Request kind discriminator (`"python_call"` for action calls).
    #[serde(rename = "type")]
    pub kind: String,
    /// Logical action namespace, e.g. `"actor_actions"`.
    pub module: String,
    /// Symbolic action name within the namespace, e.g. `"ue_spawn_from_class"`.
    pub function: String,
    /// Named parameters for the action. Order-irrelevant.
    #[serde(default)]
    pub args: ArgMap,
}

impl Request {
    /// Creates a call-kind request.
    pub fn call(
        module: impl Into<String>,
        function: impl Into<String>,
        args: ArgMap,
    ) -> Self {
        Self {
            kind: CALL_KIND.to_string(),
            module: module.into(),
            function: function.into(),
            args,
        }
    }

    /// Whether this request uses the dispatchable call kind.
    pub fn is_call(&self) -> bool {
        self.kind == CALL_KIND
    }
}
