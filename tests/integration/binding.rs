use std::collections::BTreeMap;

use serde_json::json;
use template_service_adapter::adapter::{Binder, BindingRemoval, ManifestGenerator};
use template_service_adapter::core::AdapterError;
use template_service_adapter::document::{PathError, to_native};
use template_service_adapter::hooks::InMemoryHookRunner;
use template_service_adapter::models::{CreateBindingParams, DeleteBindingParams};
use template_service_adapter::test_utils::fixtures::{
    REDIS_BINDING_TEMPLATE, REDIS_MANIFEST_TEMPLATE, REDIS_PLAN_NAME, redis_generate_params,
    redis_topology,
};
use template_service_adapter::test_utils::init_test_logging;

/// Generate a manifest, then bind against it the way the broker would.
async fn deployed_binding_params() -> (CreateBindingParams, String) {
    init_test_logging(None);
    let generator = ManifestGenerator::new(
        BTreeMap::from([(REDIS_PLAN_NAME.to_string(), REDIS_MANIFEST_TEMPLATE.to_string())]),
        InMemoryHookRunner::new(),
    );
    let manifest = generator.generate_manifest(&redis_generate_params()).await.unwrap();
    let password = manifest["instance_groups"][0]["jobs"][0]["properties"]["redis"]["password"]
        .as_str()
        .unwrap()
        .to_string();

    let params = CreateBindingParams {
        binding_id: "binding-42".to_string(),
        deployment_topology: redis_topology(),
        manifest: to_native(&manifest),
        ..CreateBindingParams::default()
    };
    (params, password)
}

#[tokio::test]
async fn test_binding_reads_generated_manifest() {
    let (params, password) = deployed_binding_params().await;

    let binding = Binder::new(REDIS_BINDING_TEMPLATE, InMemoryHookRunner::new())
        .create_binding(&params)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&binding).unwrap(),
        json!({"credentials": {"host": "127.0.0.1", "password": password, "port": 58301}})
    );
}

#[tokio::test]
async fn test_binding_for_missing_vm_fails() {
    let (mut params, _) = deployed_binding_params().await;
    params.deployment_topology.clear();

    let err = Binder::new(REDIS_BINDING_TEMPLATE, InMemoryHookRunner::new())
        .create_binding(&params)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AdapterError::Path(PathError::NotFound { ref segment, .. }) if segment == "redis_leader"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_binding_request_params_in_template() {
    let (mut params, _) = deployed_binding_params().await;
    params.request_params.insert("role".to_string(), json!("read-only"));

    let template = r#"{"credentials": {"role": "{{ params.role }}", "nodes": {{ deployment.redis_leader | length }}}}"#;
    let binding = Binder::new(template, InMemoryHookRunner::new())
        .create_binding(&params)
        .await
        .unwrap();
    assert_eq!(binding.credentials["role"], "read-only");
    assert_eq!(binding.credentials["nodes"], 1);
}

#[test]
fn test_delete_binding_needs_no_cleanup() {
    let binder = Binder::new(REDIS_BINDING_TEMPLATE, InMemoryHookRunner::new());
    let removal = binder
        .delete_binding(&DeleteBindingParams {
            binding_id: "binding-42".to_string(),
            deployment_topology: redis_topology(),
            ..DeleteBindingParams::default()
        })
        .unwrap();
    assert_eq!(removal, BindingRemoval::NoCleanupRequired);
}
