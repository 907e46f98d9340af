use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct GetScalarParameterParams {
    /// Package path of the material instance
    pub material_path: String,
    /// Scalar parameter name, e.g. "Roughness"
    pub parameter_name: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SetScalarParameterParams {
    /// Package path of the material instance
    pub material_path: String,
    /// Scalar parameter name, e.g. "Roughness"
    pub parameter_name: String,
    /// New parameter value
    pub value: f64,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SetVectorParameterParams {
    /// Package path of the material instance
    pub material_path: String,
    /// Vector parameter name, e.g. "BaseColor"
    pub parameter_name: String,
    /// RGBA channels, each 0.0 to 1.0
    pub value: [f64; 4],
}
