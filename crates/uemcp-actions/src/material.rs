//! Material-instance parameter actions. Registered as the
//! `material_actions` module.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use uemcp_bridge::{ActionModule, ActionOutput, ActionResult};
use uemcp_proto::ArgMap;

use crate::host::{with_transaction, EditorHost};
use crate::params;

pub const MODULE_NAME: &str = "material_actions";

pub fn module(host: Arc<dyn EditorHost>) -> ActionModule {
    let mut module = ActionModule::new(MODULE_NAME);
    crate::bind(
        &mut module,
        &host,
        "ue_get_material_instance_scalar_parameter",
        get_scalar,
    );
    crate::bind(
        &mut module,
        &host,
        "ue_set_material_instance_scalar_parameter",
        set_scalar,
    );
    crate::bind(
        &mut module,
        &host,
        "ue_set_material_instance_vector_parameter",
        set_vector,
    );
    module
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GetScalarParams {
    material_path: String,
    parameter_name: String,
}

fn get_scalar(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: GetScalarParams = params::parse(args)?;
    let value = host.material_scalar_parameter(&p.material_path, &p.parameter_name)?;
    ActionOutput::json(&json!({
        "success": true,
        "parameter_name": p.parameter_name,
        "value": value,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetScalarParams {
    material_path: String,
    parameter_name: String,
    value: f64,
}

fn set_scalar(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: SetScalarParams = params::parse(args)?;
    with_transaction(host, "Set material scalar parameter", || {
        host.set_material_scalar_parameter(&p.material_path, &p.parameter_name, p.value)
    })?;
    ActionOutput::json(&json!({
        "success": true,
        "parameter_name": p.parameter_name,
        "value": p.value,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetVectorParams {
    material_path: String,
    parameter_name: String,
    /// RGBA, each channel 0.0..=1.0 by convention.
    value: [f64; 4],
}

fn set_vector(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: SetVectorParams = params::parse(args)?;
    with_transaction(host, "Set material vector parameter", || {
        host.set_material_vector_parameter(&p.material_path, &p.parameter_name, p.value)
    })?;
    ActionOutput::json(&json!({
        "success": true,
        "parameter_name": p.parameter_name,
        "value": p.value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeEditorHost;
    use crate::host::EditorHost;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn call(
        host: &Arc<FakeEditorHost>,
        function: &str,
        args: Value,
    ) -> Result<Value, uemcp_bridge::ActionFailure> {
        let module = module(Arc::clone(host) as Arc<dyn EditorHost>);
        let action = module.get(function).expect("action registered");
        let args = match args {
            Value::Object(map) => map,
            other => panic!("expected object args, got {other}"),
        };
        let output = action(&args)?;
        Ok(serde_json::from_slice(&output.into_bytes()).expect("action output is JSON"))
    }

    #[test]
    fn scalar_round_trip_through_actions() {
        let host = Arc::new(FakeEditorHost::new());
        call(
            &host,
            "ue_set_material_instance_scalar_parameter",
            serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "Roughness",
                "value": 0.25,
            }),
        )
        .unwrap();

        let out = call(
            &host,
            "ue_get_material_instance_scalar_parameter",
            serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "Roughness",
            }),
        )
        .unwrap();
        assert_eq!(out["value"], 0.25);
    }

    #[test]
    fn unknown_parameter_fails_without_creating_it() {
        let host = Arc::new(FakeEditorHost::new());
        let err = call(
            &host,
            "ue_set_material_instance_scalar_parameter",
            serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "Metallic",
                "value": 1.0,
            }),
        )
        .unwrap_err();
        assert_eq!(err.error_type, "ParameterNotFound");

        // The failed write must not have materialized the parameter.
        let err = call(
            &host,
            "ue_get_material_instance_scalar_parameter",
            serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "Metallic",
            }),
        )
        .unwrap_err();
        assert_eq!(err.error_type, "ParameterNotFound");
    }

    #[test]
    fn vector_parameter_accepts_rgba() {
        let host = Arc::new(FakeEditorHost::new());
        let out = call(
            &host,
            "ue_set_material_instance_vector_parameter",
            serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "BaseColor",
                "value": [0.1, 0.2, 0.3, 1.0],
            }),
        )
        .unwrap();
        assert_eq!(out["value"][2], 0.3);
    }

    #[test]
    fn vector_value_must_have_four_channels() {
        let host = Arc::new(FakeEditorHost::new());
        let err = call(
            &host,
            "ue_set_material_instance_vector_parameter",
            serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "BaseColor",
                "value": [0.1, 0.2, 0.3],
            }),
        )
        .unwrap_err();
        assert_eq!(err.error_type, "TypeError");
    }
}
