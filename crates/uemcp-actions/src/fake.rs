//! In-memory [`EditorHost`] used by tests and the dev server.
//!
//! Models just enough of a level and a content browser to exercise the
//! action catalogue: spawned actors get engine-style labels
//! (`StaticMeshActor_1`), transactions roll the scene back on abort, and a
//! few assets are pre-seeded.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::host::{
    ActorInfo, AssetInfo, EditorHost, HostError, StaticMeshDetails, Transform, Vec3,
};

#[derive(Debug, Clone, Default)]
struct Scene {
    actors: Vec<ActorInfo>,
    /// Labels of the current selection, in selection order.
    selection: Vec<String>,
    /// Per-base-name spawn counters for label allocation.
    counters: BTreeMap<String, u64>,
    scalar_params: BTreeMap<(String, String), f64>,
    vector_params: BTreeMap<(String, String), [f64; 4]>,
}

#[derive(Debug, Default)]
struct State {
    scene: Scene,
    /// Scene snapshot taken when a transaction opened.
    snapshot: Option<Scene>,
    assets: Vec<AssetInfo>,
    meshes: BTreeMap<String, StaticMeshDetails>,
    log: Vec<String>,
}

/// Editor host backed by plain in-process state.
#[derive(Debug, Default)]
pub struct FakeEditorHost {
    state: Mutex<State>,
}

impl FakeEditorHost {
    /// An empty level with a small seeded content browser.
    pub fn new() -> Self {
        let host = Self::default();
        {
            let mut state = host.lock();
            state.assets = vec![
                AssetInfo {
                    name: "SM_Cube".to_string(),
                    path: "/Game/Meshes/SM_Cube".to_string(),
                    class_name: "StaticMesh".to_string(),
                },
                AssetInfo {
                    name: "SM_Sphere".to_string(),
                    path: "/Game/Meshes/SM_Sphere".to_string(),
                    class_name: "StaticMesh".to_string(),
                },
                AssetInfo {
                    name: "MI_Base".to_string(),
                    path: "/Game/Materials/MI_Base".to_string(),
                    class_name: "MaterialInstanceConstant".to_string(),
                },
            ];
            state.meshes.insert(
                "/Game/Meshes/SM_Cube".to_string(),
                StaticMeshDetails {
                    path: "/Game/Meshes/SM_Cube".to_string(),
                    vertex_count: 8,
                    triangle_count: 12,
                    material_slots: vec!["Default".to_string()],
                    approx_size: Vec3::new(100.0, 100.0, 100.0),
                },
            );
            state.meshes.insert(
                "/Game/Meshes/SM_Sphere".to_string(),
                StaticMeshDetails {
                    path: "/Game/Meshes/SM_Sphere".to_string(),
                    vertex_count: 482,
                    triangle_count: 960,
                    material_slots: vec!["Default".to_string()],
                    approx_size: Vec3::new(100.0, 100.0, 100.0),
                },
            );
            state.scene.scalar_params.insert(
                ("/Game/Materials/MI_Base".to_string(), "Roughness".to_string()),
                0.5,
            );
            state.scene.vector_params.insert(
                ("/Game/Materials/MI_Base".to_string(), "BaseColor".to_string()),
                [1.0, 1.0, 1.0, 1.0],
            );
        }
        host
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock means a panicking action already failed its own
        // request; the state itself is still coherent enough to continue.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn spawn(&self, class_path: &str, location: Vec3, rotation: Vec3) -> ActorInfo {
        let mut state = self.lock();
        let base = label_base(class_path);
        let counter = state.scene.counters.entry(base.clone()).or_insert(0);
        *counter += 1;
        let actor = ActorInfo {
            label: format!("{base}_{counter}"),
            class_path: class_path.to_string(),
            transform: Transform {
                location,
                rotation,
                scale: Vec3::ONE,
            },
        };
        state.scene.actors.push(actor.clone());
        actor
    }
}

/// Engine-style label base: the last segment of a class or asset path.
fn label_base(path: &str) -> String {
    path.rsplit(['.', '/'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("Actor")
        .to_string()
}

impl EditorHost for FakeEditorHost {
    fn spawn_actor_from_class(
        &self,
        class_path: &str,
        location: Vec3,
        rotation: Vec3,
    ) -> Result<ActorInfo, HostError> {
        Ok(self.spawn(class_path, location, rotation))
    }

    fn spawn_actor_from_object(
        &self,
        asset_path: &str,
        location: Vec3,
        rotation: Vec3,
    ) -> Result<ActorInfo, HostError> {
        let known = self.lock().assets.iter().any(|a| a.path == asset_path);
        if !known {
            return Err(HostError::AssetNotFound {
                path: asset_path.to_string(),
            });
        }
        Ok(self.spawn(asset_path, location, rotation))
    }

    fn delete_actor(&self, label: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        let before = state.scene.actors.len();
        state.scene.actors.retain(|a| a.label != label);
        if state.scene.actors.len() == before {
            return Err(HostError::ActorNotFound {
                label: label.to_string(),
            });
        }
        state.scene.selection.retain(|l| l != label);
        Ok(())
    }

    fn set_actor_transform(&self, label: &str, transform: Transform) -> Result<(), HostError> {
        let mut state = self.lock();
        let actor = state
            .scene
            .actors
            .iter_mut()
            .find(|a| a.label == label)
            .ok_or_else(|| HostError::ActorNotFound {
                label: label.to_string(),
            })?;
        actor.transform = transform;
        Ok(())
    }

    fn set_actor_location(&self, label: &str, location: Vec3) -> Result<(), HostError> {
        let mut state = self.lock();
        let actor = state
            .scene
            .actors
            .iter_mut()
            .find(|a| a.label == label)
            .ok_or_else(|| HostError::ActorNotFound {
                label: label.to_string(),
            })?;
        actor.transform.location = location;
        Ok(())
    }

    fn list_actors(&self) -> Result<Vec<ActorInfo>, HostError> {
        Ok(self.lock().scene.actors.clone())
    }

    fn select_all(&self) -> Result<usize, HostError> {
        let mut state = self.lock();
        state.scene.selection = state.scene.actors.iter().map(|a| a.label.clone()).collect();
        Ok(state.scene.selection.len())
    }

    fn selected_actors(&self) -> Result<Vec<ActorInfo>, HostError> {
        let state = self.lock();
        Ok(state
            .scene
            .selection
            .iter()
            .filter_map(|label| state.scene.actors.iter().find(|a| &a.label == label))
            .cloned()
            .collect())
    }

    fn duplicate_selected(&self) -> Result<Vec<ActorInfo>, HostError> {
        let originals = self.selected_actors()?;
        let mut copies = Vec::with_capacity(originals.len());
        for original in originals {
            let copy = self.spawn(
                &original.class_path,
                original.transform.location,
                original.transform.rotation,
            );
            copies.push(copy);
        }
        Ok(copies)
    }

    fn find_assets(&self, query: &str) -> Result<Vec<AssetInfo>, HostError> {
        let needle = query.to_lowercase();
        Ok(self
            .lock()
            .assets
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle)
                    || a.path.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    fn static_mesh_details(&self, asset_path: &str) -> Result<StaticMeshDetails, HostError> {
        self.lock()
            .meshes
            .get(asset_path)
            .cloned()
            .ok_or_else(|| HostError::AssetNotFound {
                path: asset_path.to_string(),
            })
    }

    fn material_scalar_parameter(
        &self,
        asset_path: &str,
        parameter: &str,
    ) -> Result<f64, HostError> {
        self.lock()
            .scene
            .scalar_params
            .get(&(asset_path.to_string(), parameter.to_string()))
            .copied()
            .ok_or_else(|| HostError::ParameterNotFound {
                path: asset_path.to_string(),
                parameter: parameter.to_string(),
            })
    }

    fn set_material_scalar_parameter(
        &self,
        asset_path: &str,
        parameter: &str,
        value: f64,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        let key = (asset_path.to_string(), parameter.to_string());
        if !state.scene.scalar_params.contains_key(&key) {
            return Err(HostError::ParameterNotFound {
                path: asset_path.to_string(),
                parameter: parameter.to_string(),
            });
        }
        state.scene.scalar_params.insert(key, value);
        Ok(())
    }

    fn set_material_vector_parameter(
        &self,
        asset_path: &str,
        parameter: &str,
        value: [f64; 4],
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        let key = (asset_path.to_string(), parameter.to_string());
        if !state.scene.vector_params.contains_key(&key) {
            return Err(HostError::ParameterNotFound {
                path: asset_path.to_string(),
                parameter: parameter.to_string(),
            });
        }
        state.scene.vector_params.insert(key, value);
        Ok(())
    }

    fn log_message(&self, message: &str) -> Result<(), HostError> {
        tracing::debug!(message, "editor log");
        self.lock().log.push(message.to_string());
        Ok(())
    }

    fn output_log_tail(&self, max_lines: usize) -> Result<Vec<String>, HostError> {
        let state = self.lock();
        let start = state.log.len().saturating_sub(max_lines);
        Ok(state.log[start..].to_vec())
    }

    fn begin_transaction(&self, _description: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        if state.snapshot.is_some() {
            return Err(HostError::TransactionAlreadyOpen);
        }
        state.snapshot = Some(state.scene.clone());
        Ok(())
    }

    fn commit_transaction(&self) -> Result<(), HostError> {
        let mut state = self.lock();
        if state.snapshot.take().is_none() {
            return Err(HostError::NoOpenTransaction);
        }
        Ok(())
    }

    fn abort_transaction(&self) -> Result<(), HostError> {
        let mut state = self.lock();
        match state.snapshot.take() {
            Some(scene) => {
                state.scene = scene;
                Ok(())
            }
            None => Err(HostError::NoOpenTransaction),
        }
    }
}
