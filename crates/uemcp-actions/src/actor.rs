//! Level-editing actions: spawning, placing, selecting, and deleting
//! actors. Registered as the `actor_actions` module.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use uemcp_bridge::{ActionModule, ActionOutput, ActionResult};
use uemcp_proto::ArgMap;

use crate::host::{with_transaction, EditorHost, Transform, Vec3};
use crate::params;

pub const MODULE_NAME: &str = "actor_actions";

pub fn module(host: Arc<dyn EditorHost>) -> ActionModule {
    let mut module = ActionModule::new(MODULE_NAME);
    crate::bind(&mut module, &host, "ue_spawn_from_class", spawn_from_class);
    crate::bind(&mut module, &host, "ue_spawn_from_object", spawn_from_object);
    crate::bind(&mut module, &host, "ue_delete_by_label", delete_by_label);
    crate::bind(&mut module, &host, "ue_set_transform", set_transform);
    crate::bind(&mut module, &host, "ue_set_location", set_location);
    crate::bind(
        &mut module,
        &host,
        "ue_list_all_with_locations",
        list_all_with_locations,
    );
    crate::bind(&mut module, &host, "ue_duplicate_selected", duplicate_selected);
    crate::bind(&mut module, &host, "ue_select_all", select_all);
    module
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawnFromClassParams {
    actor_class: String,
    #[serde(default)]
    location: Option<[f64; 3]>,
    #[serde(default)]
    rotation: Option<[f64; 3]>,
}

fn spawn_from_class(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: SpawnFromClassParams = params::parse(args)?;
    let location = p.location.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let rotation = p.rotation.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let actor = with_transaction(host, "Spawn actor from class", || {
        host.spawn_actor_from_class(&p.actor_class, location, rotation)
    })?;
    ActionOutput::json(&json!({
        "success": true,
        "actor_label": actor.label,
        "actor_class": actor.class_path,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawnFromObjectParams {
    object_path: String,
    #[serde(default)]
    location: Option<[f64; 3]>,
    #[serde(default)]
    rotation: Option<[f64; 3]>,
}

fn spawn_from_object(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: SpawnFromObjectParams = params::parse(args)?;
    let location = p.location.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let rotation = p.rotation.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let actor = with_transaction(host, "Spawn actor from object", || {
        host.spawn_actor_from_object(&p.object_path, location, rotation)
    })?;
    ActionOutput::json(&json!({
        "success": true,
        "actor_label": actor.label,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteByLabelParams {
    actor_label: String,
}

fn delete_by_label(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: DeleteByLabelParams = params::parse(args)?;
    with_transaction(host, "Delete actor", || host.delete_actor(&p.actor_label))?;
    ActionOutput::json(&json!({
        "success": true,
        "deleted": p.actor_label,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetTransformParams {
    actor_label: String,
    location: [f64; 3],
    rotation: [f64; 3],
    #[serde(default)]
    scale: Option<[f64; 3]>,
}

fn set_transform(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: SetTransformParams = params::parse(args)?;
    let transform = Transform {
        location: p.location.into(),
        rotation: p.rotation.into(),
        scale: p.scale.map(Vec3::from).unwrap_or(Vec3::ONE),
    };
    with_transaction(host, "Set actor transform", || {
        host.set_actor_transform(&p.actor_label, transform)
    })?;
    ActionOutput::json(&json!({
        "success": true,
        "actor_label": p.actor_label,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetLocationParams {
    actor_label: String,
    location: [f64; 3],
}

fn set_location(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: SetLocationParams = params::parse(args)?;
    with_transaction(host, "Set actor location", || {
        host.set_actor_location(&p.actor_label, p.location.into())
    })?;
    ActionOutput::json(&json!({
        "success": true,
        "actor_label": p.actor_label,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

fn list_all_with_locations(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let _: NoParams = params::parse(args)?;
    let actors = host.list_actors()?;
    let listing: Vec<_> = actors
        .iter()
        .map(|a| {
            json!({
                "label": a.label,
                "location": a.transform.location,
            })
        })
        .collect();
    ActionOutput::json(&json!({
        "success": true,
        "actors": listing,
    }))
}

fn duplicate_selected(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let _: NoParams = params::parse(args)?;
    let copies = with_transaction(host, "Duplicate selected actors", || {
        host.duplicate_selected()
    })?;
    let labels: Vec<_> = copies.iter().map(|a| a.label.clone()).collect();
    ActionOutput::json(&json!({
        "success": true,
        "duplicated": labels,
    }))
}

fn select_all(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let _: NoParams = params::parse(args)?;
    let count = host.select_all()?;
    ActionOutput::json(&json!({
        "success": true,
        "selected_count": count,
    }))
}
