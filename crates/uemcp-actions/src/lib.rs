//! The uemcp action catalogue.
//!
//! Actions are grouped into modules dispatched by `(module, function)`
//! string pairs: `actor_actions` for level editing, `asset_actions` for the
//! content browser, `material_actions` for material instances, and
//! `util_actions` for logging. Every action talks to the editor through the
//! [`EditorHost`] capability trait; [`FakeEditorHost`] backs the catalogue
//! in tests and in the `uemcp-bridged` dev server.
//!
//! Mutating actions run inside a host transaction so a failed call leaves
//! no partial edit behind.

pub mod actor;
pub mod asset;
pub mod fake;
pub mod host;
pub mod material;
pub mod params;
pub mod util;

pub use fake::FakeEditorHost;
pub use host::{
    with_transaction, ActorInfo, AssetInfo, EditorHost, HostError, StaticMeshDetails, Transform,
    Vec3,
};

use std::sync::Arc;

use uemcp_bridge::{ActionModule, ActionRegistry, ActionResult, StaticModules};
use uemcp_proto::ArgMap;

/// Builds the full registry serving the catalogue against one host.
pub fn registry(host: Arc<dyn EditorHost>) -> ActionRegistry {
    ActionRegistry::new(
        StaticModules::new()
            .with_module(actor::module(Arc::clone(&host)))
            .with_module(asset::module(Arc::clone(&host)))
            .with_module(material::module(Arc::clone(&host)))
            .with_module(util::module(host)),
    )
}

/// Adapts a plain `(host, args)` function into a registered closure.
pub(crate) fn bind(
    module: &mut ActionModule,
    host: &Arc<dyn EditorHost>,
    name: &str,
    action: fn(&dyn EditorHost, &ArgMap) -> ActionResult,
) {
    let host = Arc::clone(host);
    module.register(name, move |args| action(host.as_ref(), args));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_serves_all_four_modules() {
        let registry = registry(Arc::new(FakeEditorHost::new()));
        assert_eq!(
            registry.module_names(),
            vec![
                "actor_actions".to_string(),
                "asset_actions".to_string(),
                "material_actions".to_string(),
                "util_actions".to_string(),
            ]
        );
    }
}
