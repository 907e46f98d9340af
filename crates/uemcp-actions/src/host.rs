//! The capability boundary between the action catalogue and the editor.
//!
//! Actions never touch editor APIs directly; everything goes through the
//! dyn-safe [`EditorHost`] trait. In production the trait is backed by the
//! engine-side plugin; in tests and the dev server it is backed by
//! [`crate::fake::FakeEditorHost`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use uemcp_bridge::ActionFailure;

/// A point or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

/// Full placement of an actor in the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// A placed actor as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorInfo {
    /// Unique label within the level.
    pub label: String,
    /// Class path of the actor, e.g. `/Script/Engine.StaticMeshActor`.
    pub class_path: String,
    pub transform: Transform,
}

/// A content-browser asset as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    /// Package path, e.g. `/Game/Meshes/SM_Cube`.
    pub path: String,
    pub class_name: String,
}

/// Geometry summary for a static mesh asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticMeshDetails {
    pub path: String,
    pub vertex_count: u64,
    pub triangle_count: u64,
    pub material_slots: Vec<String>,
    /// Axis-aligned bounding box extent.
    pub approx_size: Vec3,
}

/// Errors raised by editor host operations.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("No actor labeled '{label}'.")]
    ActorNotFound { label: String },

    #[error("No asset found at '{path}'.")]
    AssetNotFound { path: String },

    #[error("Material '{path}' has no parameter named '{parameter}'.")]
    ParameterNotFound { path: String, parameter: String },

    #[error("No transaction is open.")]
    NoOpenTransaction,

    #[error("A transaction is already open.")]
    TransactionAlreadyOpen,

    /// Any other failure from the editor side.
    #[error("Editor call failed: {0}")]
    Editor(String),
}

impl HostError {
    /// The error's type name as reported in the response envelope.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostError::ActorNotFound { .. } => "ActorNotFound",
            HostError::AssetNotFound { .. } => "AssetNotFound",
            HostError::ParameterNotFound { .. } => "ParameterNotFound",
            HostError::NoOpenTransaction | HostError::TransactionAlreadyOpen => {
                "TransactionError"
            }
            HostError::Editor(_) => "EditorError",
        }
    }
}

impl From<HostError> for ActionFailure {
    fn from(e: HostError) -> Self {
        ActionFailure::from_error(e.type_name(), &e)
    }
}

/// Capabilities the embedding editor exposes to the action catalogue.
///
/// Implementations are called from a single dedicated executor thread, so
/// they may assume serialized access. They must still be `Send + Sync`
/// because the handle is shared across the registry's closures.
pub trait EditorHost: Send + Sync {
    /// Spawns an actor from a class path at the given placement.
    fn spawn_actor_from_class(
        &self,
        class_path: &str,
        location: Vec3,
        rotation: Vec3,
    ) -> Result<ActorInfo, HostError>;

    /// Spawns an actor from a content-browser asset (e.g. a static mesh).
    fn spawn_actor_from_object(
        &self,
        asset_path: &str,
        location: Vec3,
        rotation: Vec3,
    ) -> Result<ActorInfo, HostError>;

    /// Deletes the actor with the given label.
    fn delete_actor(&self, label: &str) -> Result<(), HostError>;

    /// Replaces the actor's full transform.
    fn set_actor_transform(&self, label: &str, transform: Transform) -> Result<(), HostError>;

    /// Moves the actor, leaving rotation and scale untouched.
    fn set_actor_location(&self, label: &str, location: Vec3) -> Result<(), HostError>;

    /// All actors currently placed in the level.
    fn list_actors(&self) -> Result<Vec<ActorInfo>, HostError>;

    /// Selects every actor in the level; returns the selection size.
    fn select_all(&self) -> Result<usize, HostError>;

    /// The current selection.
    fn selected_actors(&self) -> Result<Vec<ActorInfo>, HostError>;

    /// Duplicates the current selection; returns the copies.
    fn duplicate_selected(&self) -> Result<Vec<ActorInfo>, HostError>;

    /// Assets whose name or path contains the query, case-insensitive.
    fn find_assets(&self, query: &str) -> Result<Vec<AssetInfo>, HostError>;

    /// Geometry summary for a static mesh asset.
    fn static_mesh_details(&self, asset_path: &str) -> Result<StaticMeshDetails, HostError>;

    /// Reads a scalar parameter from a material instance.
    fn material_scalar_parameter(
        &self,
        asset_path: &str,
        parameter: &str,
    ) -> Result<f64, HostError>;

    /// Writes a scalar parameter on a material instance.
    fn set_material_scalar_parameter(
        &self,
        asset_path: &str,
        parameter: &str,
        value: f64,
    ) -> Result<(), HostError>;

    /// Writes an RGBA vector parameter on a material instance.
    fn set_material_vector_parameter(
        &self,
        asset_path: &str,
        parameter: &str,
        value: [f64; 4],
    ) -> Result<(), HostError>;

    /// Writes a line to the editor output log.
    fn log_message(&self, message: &str) -> Result<(), HostError>;

    /// The most recent `max_lines` lines of the output log.
    fn output_log_tail(&self, max_lines: usize) -> Result<Vec<String>, HostError>;

    /// Opens an undo unit with the given description.
    fn begin_transaction(&self, description: &str) -> Result<(), HostError>;

    /// Closes the open undo unit, keeping its edits.
    fn commit_transaction(&self) -> Result<(), HostError>;

    /// Closes the open undo unit, rolling its edits back.
    fn abort_transaction(&self) -> Result<(), HostError>;
}

/// Runs `f` inside a host transaction.
///
/// On failure the transaction is aborted so the edit never lands half-done;
/// the action's own error wins over any abort failure.
pub fn with_transaction<T>(
    host: &dyn EditorHost,
    description: &str,
    f: impl FnOnce() -> Result<T, HostError>,
) -> Result<T, HostError> {
    host.begin_transaction(description)?;
    match f() {
        Ok(value) => {
            host.commit_transaction()?;
            Ok(value)
        }
        Err(e) => {
            let _ = host.abort_transaction();
            Err(e)
        }
    }
}
