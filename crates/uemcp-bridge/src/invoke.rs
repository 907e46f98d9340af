//! Action invoker: executes a resolved action and normalizes the outcome
//! into a response envelope.
//!
//! Two independent checks run on every successful call, because actions
//! are third-party-authored and may violate the "return a JSON string"
//! contract: the returned bytes must be UTF-8 text, and that text must
//! parse as JSON. A malformed action must never crash the transport layer
//! or hand ambiguous data to the client.

use std::panic::{catch_unwind, AssertUnwindSafe};

use uemcp_proto::{ErrorKind, Request, ResponseEnvelope};

use crate::registry::ActionRegistry;
use crate::truncate_chars;

/// How much of an offending return value is echoed back for diagnosis.
const RETURN_SNIPPET_LEN: usize = 200;

/// Executes the request against the registry and produces the envelope.
///
/// Every enumerated failure comes back as a `success: false` envelope; the
/// only way out of this function is a value.
pub fn invoke(registry: &ActionRegistry, request: &Request) -> ResponseEnvelope {
    if !request.is_call() {
        return ResponseEnvelope {
            success: false,
            message: Some(format!("Unsupported type: {}", request.kind)),
            result: None,
            error_type: None,
            traceback: None,
        };
    }

    let action = match registry.resolve_action(&request.module, &request.function) {
        Ok(action) => action,
        Err(e) => return ResponseEnvelope::failure(e.kind(), e.to_string()),
    };

    // Actions call into an embedding host and may panic; a panicking
    // action fails its own request, not the server.
    let outcome = catch_unwind(AssertUnwindSafe(|| action(&request.args)));

    let result = match outcome {
        Ok(result) => result,
        Err(panic) => {
            let detail = panic_message(&panic);
            return ResponseEnvelope::action_failure(
                ErrorKind::ActionRuntimeError.wire_name(),
                format!(
                    "Action '{}.{}' panicked: {detail}",
                    request.module, request.function
                ),
                None,
            );
        }
    };

    let output = match result {
        Ok(output) => output,
        Err(failure) => {
            return ResponseEnvelope::action_failure(
                failure.error_type,
                failure.message,
                failure.traceback,
            )
        }
    };

    let bytes = output.into_bytes();
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            return ResponseEnvelope::failure(
                ErrorKind::InvalidReturnType,
                format!(
                    "Action '{}.{}' returned a non-string value ({} bytes of non-UTF-8 data).",
                    request.module,
                    request.function,
                    e.as_bytes().len()
                ),
            );
        }
    };

    if let Err(e) = serde_json::from_str::<serde::de::IgnoredAny>(&text) {
        return ResponseEnvelope::failure(
            ErrorKind::InvalidReturnFormat,
            format!(
                "Action '{}.{}' did not return a valid JSON string. Error: {e}. Returned: {}",
                request.module,
                request.function,
                truncate_chars(&text, RETURN_SNIPPET_LEN)
            ),
        );
    }

    ResponseEnvelope::ok(text)
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ActionFailure, ActionModule, ActionOutput, StaticModules};
    use pretty_assertions::assert_eq;
    use uemcp_proto::ArgMap;

    fn test_registry() -> ActionRegistry {
        let module = ActionModule::new("test_actions")
            .with_action("good", |_args| {
                Ok(ActionOutput::text(r#"{"success":true,"value":7}"#))
            })
            .with_action("echo_message", |args| {
                let message = args.get("message").cloned().unwrap_or_default();
                ActionOutput::json(&serde_json::json!({
                    "success": true,
                    "received_message": message,
                }))
            })
            .with_action("bare_string", |_args| {
                Ok(ActionOutput::text("something went wrong"))
            })
            .with_action("binary_garbage", |_args| {
                Ok(ActionOutput::raw(vec![0xff, 0xfe, 0x00, 0x80]))
            })
            .with_action("fails", |_args| {
                Err(ActionFailure::new("ActorNotFound", "No actor labeled 'Cube_7'."))
            })
            .with_action("panics", |_args| panic!("host exploded"));
        ActionRegistry::new(StaticModules::new().with_module(module))
    }

    fn call(function: &str) -> ResponseEnvelope {
        let registry = test_registry();
        invoke(
            &registry,
            &Request::call("test_actions", function, ArgMap::new()),
        )
    }

    #[test]
    fn successful_call_keeps_payload_as_string() {
        let env = call("good");
        assert!(env.success);
        assert_eq!(env.result.as_deref(), Some(r#"{"success":true,"value":7}"#));
        // The payload must itself decode as JSON.
        let inner: serde_json::Value = serde_json::from_str(env.result.as_deref().unwrap()).unwrap();
        assert_eq!(inner["value"], 7);
    }

    #[test]
    fn unsupported_kind_is_payload_level_failure() {
        let registry = test_registry();
        let mut request = Request::call("test_actions", "good", ArgMap::new());
        request.kind = "python".to_string();
        let env = invoke(&registry, &request);
        assert!(!env.success);
        assert!(env.message.unwrap().contains("Unsupported type: python"));
    }

    #[test]
    fn unknown_module_reports_module_not_found() {
        let registry = test_registry();
        let env = invoke(
            &registry,
            &Request::call("ghost_actions", "good", ArgMap::new()),
        );
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("ModuleNotFoundError"));
    }

    #[test]
    fn unknown_function_reports_function_not_found() {
        let env = call("ue_vanish");
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("FunctionNotFoundError"));
    }

    #[test]
    fn path_escape_reports_value_error() {
        let registry = test_registry();
        let env = invoke(
            &registry,
            &Request::call("../../etc", "passwd", ArgMap::new()),
        );
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("ValueError"));
        assert!(env.message.unwrap().contains("restricted characters"));
    }

    #[test]
    fn non_json_string_reports_invalid_return_format() {
        let env = call("bare_string");
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("InvalidReturnFormat"));
        let message = env.message.unwrap();
        assert!(message.contains("something went wrong"));
        assert!(message.contains("test_actions.bare_string"));
    }

    #[test]
    fn non_utf8_bytes_report_invalid_return_type() {
        let env = call("binary_garbage");
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("InvalidReturnType"));
    }

    #[test]
    fn action_failure_carries_its_own_type_name() {
        let env = call("fails");
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("ActorNotFound"));
        assert_eq!(env.message.as_deref(), Some("No actor labeled 'Cube_7'."));
    }

    #[test]
    fn panicking_action_fails_only_its_request() {
        let env = call("panics");
        assert!(!env.success);
        assert_eq!(env.error_type.as_deref(), Some("ActionRuntimeError"));
        assert!(env.message.unwrap().contains("host exploded"));

        // The registry is still usable afterwards.
        let env = call("good");
        assert!(env.success);
    }

    #[test]
    fn named_arguments_reach_the_action() {
        let registry = test_registry();
        let mut args = ArgMap::new();
        args.insert("message".into(), "hello".into());
        let env = invoke(
            &registry,
            &Request::call("test_actions", "echo_message", args),
        );
        assert!(env.success);
        let inner: serde_json::Value =
            serde_json::from_str(env.result.as_deref().unwrap()).unwrap();
        assert_eq!(inner["received_message"], "hello");
    }

    #[test]
    fn long_bad_return_is_truncated_for_diagnosis() {
        let module = ActionModule::new("test_actions").with_action("spam", |_args| {
            Ok(ActionOutput::text("x".repeat(5000)))
        });
        let registry = ActionRegistry::new(StaticModules::new().with_module(module));
        let env = invoke(
            &registry,
            &Request::call("test_actions", "spam", ArgMap::new()),
        );
        assert!(!env.success);
        // 200 chars of payload plus the surrounding diagnosis text.
        assert!(env.message.unwrap().len() < 600);
    }
}
