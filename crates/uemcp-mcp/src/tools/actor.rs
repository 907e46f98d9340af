use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SpawnActorFromClassParams {
    /// Actor class path, e.g. "/Script/Engine.StaticMeshActor"
    pub actor_class: String,
    /// World location [x, y, z] (defaults to origin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<[f64; 3]>,
    /// Rotation [pitch, yaw, roll] in degrees (defaults to zero)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SpawnActorFromObjectParams {
    /// Content-browser asset path, e.g. "/Game/Meshes/SM_Cube"
    pub object_path: String,
    /// World location [x, y, z] (defaults to origin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<[f64; 3]>,
    /// Rotation [pitch, yaw, roll] in degrees (defaults to zero)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DeleteActorParams {
    /// Label of the actor to delete
    pub actor_label: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SetActorTransformParams {
    /// Label of the actor to place
    pub actor_label: String,
    /// World location [x, y, z]
    pub location: [f64; 3],
    /// Rotation [pitch, yaw, roll] in degrees
    pub rotation: [f64; 3],
    /// Scale [x, y, z] (defaults to uniform 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SetActorLocationParams {
    /// Label of the actor to move
    pub actor_label: String,
    /// World location [x, y, z]
    pub location: [f64; 3],
}
