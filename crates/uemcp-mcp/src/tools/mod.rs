pub mod actor;
pub mod asset;
pub mod material;
pub mod util;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool_handler, tool_router, ServerHandler};
use serde::Serialize;

use uemcp_bridge::BridgeClient;
use uemcp_proto::ArgMap;

use actor::{
    DeleteActorParams, SetActorLocationParams, SetActorTransformParams,
    SpawnActorFromClassParams, SpawnActorFromObjectParams,
};
use asset::{FindAssetsParams, StaticMeshDetailsParams};
use material::{GetScalarParameterParams, SetScalarParameterParams, SetVectorParameterParams};
use util::{GetOutputLogParams, PrintMessageParams};

#[derive(Clone)]
pub struct UnrealMcp {
    client: BridgeClient,
    tool_router: ToolRouter<Self>,
}

impl UnrealMcp {
    /// Access the tool router for testing/introspection.
    #[allow(dead_code)]
    pub fn router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }

    /// Forwards one action call to the editor bridge and renders the
    /// outcome as tool text. Bridge-side failures come back as "Error:"
    /// text rather than protocol errors, so the model can read and react
    /// to them.
    async fn run_action<T: Serialize>(
        &self,
        module: &str,
        function: &str,
        params: &T,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        tracing::debug!(module, function, "forwarding tool call to the bridge");
        let args = match serde_json::to_value(params) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => ArgMap::new(),
            Err(e) => {
                return Ok(CallToolResult::success(vec![Content::text(format!(
                    "Error: failed to serialize parameters: {e}"
                ))]));
            }
        };
        match self.client.call(module, function, args).await {
            Ok(outcome) => Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&outcome.into_json())
                    .unwrap_or_else(|_| "{}".to_string()),
            )])),
            Err(e) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }
}

/// Empty argument set for actions that take none.
#[derive(Serialize)]
struct NoArgs {}

#[tool_router]
impl UnrealMcp {
    pub fn new(client: BridgeClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    // ── Actors ─────────────────────────────────────────────

    /// Spawn an actor from a class path (e.g. "/Script/Engine.StaticMeshActor") at an optional location and rotation. Returns the allocated actor label.
    #[rmcp::tool]
    async fn spawn_actor_from_class(
        &self,
        Parameters(params): Parameters<SpawnActorFromClassParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_spawn_from_class", &params)
            .await
    }

    /// Spawn an actor from a content-browser asset (e.g. a static mesh at "/Game/Meshes/SM_Cube"). Returns the allocated actor label.
    #[rmcp::tool]
    async fn spawn_actor_from_object(
        &self,
        Parameters(params): Parameters<SpawnActorFromObjectParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_spawn_from_object", &params)
            .await
    }

    /// Delete the actor with the given label.
    #[rmcp::tool]
    async fn delete_actor(
        &self,
        Parameters(params): Parameters<DeleteActorParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_delete_by_label", &params)
            .await
    }

    /// Set an actor's full transform: location, rotation, and optional scale.
    #[rmcp::tool]
    async fn set_actor_transform(
        &self,
        Parameters(params): Parameters<SetActorTransformParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_set_transform", &params)
            .await
    }

    /// Move an actor to a new location, leaving rotation and scale untouched.
    #[rmcp::tool]
    async fn set_actor_location(
        &self,
        Parameters(params): Parameters<SetActorLocationParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_set_location", &params)
            .await
    }

    /// List all actors in the current level with their labels and world locations.
    #[rmcp::tool]
    async fn list_actors(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_list_all_with_locations", &NoArgs {})
            .await
    }

    /// Duplicate the currently selected actors. Returns the labels of the copies.
    #[rmcp::tool]
    async fn duplicate_selected_actors(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_duplicate_selected", &NoArgs {})
            .await
    }

    /// Select every actor in the current level. Returns the selection count.
    #[rmcp::tool]
    async fn select_all_actors(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("actor_actions", "ue_select_all", &NoArgs {})
            .await
    }

    // ── Assets ─────────────────────────────────────────────

    /// Search the content browser for assets whose name or path contains the query.
    #[rmcp::tool]
    async fn find_assets(
        &self,
        Parameters(params): Parameters<FindAssetsParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("asset_actions", "ue_find_asset_by_query", &params)
            .await
    }

    /// Get geometry details (vertex/triangle counts, material slots, bounds) for a static mesh asset.
    #[rmcp::tool]
    async fn get_static_mesh_details(
        &self,
        Parameters(params): Parameters<StaticMeshDetailsParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("asset_actions", "ue_get_static_mesh_asset_details", &params)
            .await
    }

    // ── Materials ──────────────────────────────────────────

    /// Read a scalar parameter from a material instance.
    #[rmcp::tool]
    async fn get_material_scalar_parameter(
        &self,
        Parameters(params): Parameters<GetScalarParameterParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action(
            "material_actions",
            "ue_get_material_instance_scalar_parameter",
            &params,
        )
        .await
    }

    /// Set a scalar parameter on a material instance.
    #[rmcp::tool]
    async fn set_material_scalar_parameter(
        &self,
        Parameters(params): Parameters<SetScalarParameterParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action(
            "material_actions",
            "ue_set_material_instance_scalar_parameter",
            &params,
        )
        .await
    }

    /// Set an RGBA vector parameter on a material instance.
    #[rmcp::tool]
    async fn set_material_vector_parameter(
        &self,
        Parameters(params): Parameters<SetVectorParameterParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action(
            "material_actions",
            "ue_set_material_instance_vector_parameter",
            &params,
        )
        .await
    }

    // ── Utilities ──────────────────────────────────────────

    /// Write a message to the editor output log.
    #[rmcp::tool]
    async fn print_message(
        &self,
        Parameters(params): Parameters<PrintMessageParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("util_actions", "ue_print_message", &params)
            .await
    }

    /// Read the most recent lines of the editor output log.
    #[rmcp::tool]
    async fn get_output_log(
        &self,
        Parameters(params): Parameters<GetOutputLogParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.run_action("util_actions", "ue_get_output_log", &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use uemcp_bridge::ClientConfig;

    #[test]
    fn tool_router_includes_actor_tools() {
        let mcp = UnrealMcp::new(BridgeClient::new());
        assert!(mcp.router().map.contains_key("spawn_actor_from_class"));
        assert!(mcp.router().map.contains_key("list_actors"));
    }

    /// A tool call against a dead bridge must surface the refusal as
    /// readable text, not a protocol error.
    #[tokio::test]
    async fn dead_bridge_reports_refusal_as_text() {
        // Bind-then-drop to find a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ClientConfig::default().port(port).timeout_secs(5);
        let mcp = UnrealMcp::new(BridgeClient::with_config(config));

        let result = mcp
            .print_message(Parameters(PrintMessageParams {
                message: "anyone there?".to_string(),
            }))
            .await
            .expect("tool call should not raise a protocol error");

        let text = match &result.content[0].raw {
            RawContent::Text(t) => t.text.as_str(),
            other => panic!("expected text content, got: {other:?}"),
        };
        assert!(text.starts_with("Error:"), "got: {text}");
        assert!(text.contains("refused"), "got: {text}");
    }
}

#[tool_handler]
impl ServerHandler for UnrealMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Unreal editor automation tools. Spawn, place, and delete actors, \
                 search the content browser, tweak material instance parameters, \
                 and read the editor output log. All tools require the editor \
                 bridge TCP server to be running inside the editor."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
