use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct FindAssetsParams {
    /// Substring to match against asset names and paths, case-insensitive
    pub query: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct StaticMeshDetailsParams {
    /// Package path of the static mesh, e.g. "/Game/Meshes/SM_Cube"
    pub asset_path: String,
}
