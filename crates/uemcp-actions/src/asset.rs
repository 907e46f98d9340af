//! Content-browser actions. Registered as the `asset_actions` module.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use uemcp_bridge::{ActionModule, ActionOutput, ActionResult};
use uemcp_proto::ArgMap;

use crate::host::EditorHost;
use crate::params;

pub const MODULE_NAME: &str = "asset_actions";

pub fn module(host: Arc<dyn EditorHost>) -> ActionModule {
    let mut module = ActionModule::new(MODULE_NAME);
    crate::bind(&mut module, &host, "ue_find_asset_by_query", find_by_query);
    crate::bind(
        &mut module,
        &host,
        "ue_get_static_mesh_asset_details",
        static_mesh_details,
    );
    module
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FindByQueryParams {
    query: String,
}

fn find_by_query(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: FindByQueryParams = params::parse(args)?;
    let assets = host.find_assets(&p.query)?;
    ActionOutput::json(&json!({
        "success": true,
        "query": p.query,
        "assets": assets,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticMeshDetailsParams {
    asset_path: String,
}

fn static_mesh_details(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: StaticMeshDetailsParams = params::parse(args)?;
    let details = host.static_mesh_details(&p.asset_path)?;
    ActionOutput::json(&json!({
        "success": true,
        "details": details,
    }))
}
