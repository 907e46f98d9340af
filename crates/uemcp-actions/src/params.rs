//! Typed extraction of named arguments.
//!
//! Each action declares a parameter struct with `deny_unknown_fields`; a
//! request whose args do not fit the schema fails in the envelope, never at
//! the transport layer.

use serde::de::DeserializeOwned;
use serde_json::Value;

use uemcp_bridge::ActionFailure;
use uemcp_proto::ArgMap;

/// Deserializes the request's named arguments into `T`.
///
/// Unknown, missing, or mistyped keys come back as a `TypeError` failure
/// naming the offending field, mirroring what a keyword-argument mismatch
/// reports.
pub fn parse<T: DeserializeOwned>(args: &ArgMap) -> Result<T, ActionFailure> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ActionFailure::new("TypeError", format!("Invalid arguments: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Params {
        actor_label: String,
        #[serde(default)]
        location: Option<[f64; 3]>,
    }

    fn args(json: serde_json::Value) -> ArgMap {
        match json {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn parses_known_fields_and_defaults() {
        let p: Params = parse(&args(serde_json::json!({"actor_label": "Cube_1"}))).unwrap();
        assert_eq!(
            p,
            Params {
                actor_label: "Cube_1".to_string(),
                location: None
            }
        );
    }

    #[test]
    fn unknown_field_is_a_type_error() {
        let err = parse::<Params>(&args(serde_json::json!({
            "actor_label": "Cube_1",
            "loction": [0, 0, 0]
        })))
        .unwrap_err();
        assert_eq!(err.error_type, "TypeError");
        assert!(err.message.contains("loction"));
    }

    #[test]
    fn missing_required_field_is_a_type_error() {
        let err = parse::<Params>(&args(serde_json::json!({}))).unwrap_err();
        assert_eq!(err.error_type, "TypeError");
        assert!(err.message.contains("actor_label"));
    }

    #[test]
    fn mistyped_field_is_a_type_error() {
        let err = parse::<Params>(&args(serde_json::json!({
            "actor_label": 7
        })))
        .unwrap_err();
        assert_eq!(err.error_type, "TypeError");
    }
}
