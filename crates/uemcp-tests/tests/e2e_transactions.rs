//! Transactional behavior over the wire: a failed mutating action must
//! leave the level exactly as it was.

use pretty_assertions::assert_eq;
use serde_json::Value;

use uemcp_bridge::CallError;
use uemcp_proto::ArgMap;
use uemcp_tests::TestBridge;

fn args(json: Value) -> ArgMap {
    match json {
        Value::Object(map) => map,
        other => panic!("expected object args, got {other}"),
    }
}

#[tokio::test]
async fn failed_transform_leaves_the_level_untouched() {
    let bridge = TestBridge::with_fake_editor().await;
    let client = bridge.client();

    client
        .call(
            "actor_actions",
            "ue_spawn_from_class",
            args(serde_json::json!({
                "actor_class": "/Script/Engine.StaticMeshActor",
                "location": [1.0, 2.0, 3.0],
            })),
        )
        .await
        .expect("spawn should succeed");

    let result = client
        .call(
            "actor_actions",
            "ue_set_transform",
            args(serde_json::json!({
                "actor_label": "NoSuchActor_9",
                "location": [0.0, 0.0, 0.0],
                "rotation": [0.0, 0.0, 0.0],
            })),
        )
        .await;
    match result {
        Err(CallError::Action { error_type, .. }) => {
            assert_eq!(error_type.as_deref(), Some("ActorNotFound"));
        }
        other => panic!("expected action error, got {other:?}"),
    }

    let outcome = client
        .call("actor_actions", "ue_list_all_with_locations", ArgMap::new())
        .await
        .expect("listing should succeed");
    let data = outcome.data.expect("structured payload");
    let actors = data["actors"].as_array().expect("actors array");
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0]["location"]["x"], 1.0);
}

#[tokio::test]
async fn failed_parameter_write_does_not_create_the_parameter() {
    let bridge = TestBridge::with_fake_editor().await;
    let client = bridge.client();

    let result = client
        .call(
            "material_actions",
            "ue_set_material_instance_scalar_parameter",
            args(serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "Metallic",
                "value": 1.0,
            })),
        )
        .await;
    assert!(matches!(result, Err(CallError::Action { .. })));

    // The parameter must still be absent after the failed write.
    let result = client
        .call(
            "material_actions",
            "ue_get_material_instance_scalar_parameter",
            args(serde_json::json!({
                "material_path": "/Game/Materials/MI_Base",
                "parameter_name": "Metallic",
            })),
        )
        .await;
    match result {
        Err(CallError::Action { error_type, .. }) => {
            assert_eq!(error_type.as_deref(), Some("ParameterNotFound"));
        }
        other => panic!("expected action error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_then_relist_reflects_the_commit() {
    let bridge = TestBridge::with_fake_editor().await;
    let client = bridge.client();

    client
        .call(
            "actor_actions",
            "ue_spawn_from_class",
            args(serde_json::json!({"actor_class": "/Script/Engine.StaticMeshActor"})),
        )
        .await
        .expect("spawn should succeed");

    client
        .call(
            "actor_actions",
            "ue_delete_by_label",
            args(serde_json::json!({"actor_label": "StaticMeshActor_1"})),
        )
        .await
        .expect("delete should succeed");

    let outcome = client
        .call("actor_actions", "ue_list_all_with_locations", ArgMap::new())
        .await
        .expect("listing should succeed");
    let data = outcome.data.expect("structured payload");
    assert!(data["actors"].as_array().expect("actors array").is_empty());
}
