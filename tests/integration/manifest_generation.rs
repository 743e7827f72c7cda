use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use template_service_adapter::adapter::ManifestGenerator;
use template_service_adapter::core::AdapterError;
use template_service_adapter::document::{lookup, to_native};
use template_service_adapter::hooks::InMemoryHookRunner;
use template_service_adapter::models::{MaxInFlight, UpdatePolicy};
use template_service_adapter::templating::{FixedSecretGenerator, FunctionError};
use template_service_adapter::test_utils::fixtures::{
    REDIS_MANIFEST_TEMPLATE, REDIS_PLAN_NAME, redis_generate_params,
};
use template_service_adapter::test_utils::init_test_logging;

fn redis_generator() -> ManifestGenerator<InMemoryHookRunner> {
    init_test_logging(None);
    ManifestGenerator::new(
        BTreeMap::from([(REDIS_PLAN_NAME.to_string(), REDIS_MANIFEST_TEMPLATE.to_string())]),
        InMemoryHookRunner::new(),
    )
}

/// Every `gen_password()` call in a render must yield a distinct credential.
#[tokio::test]
async fn test_generated_passwords_are_fresh() {
    let template = "a: {{ gen_password() }}\nb: {{ gen_password() }}\n";
    let generator = ManifestGenerator::new(
        BTreeMap::from([(REDIS_PLAN_NAME.to_string(), template.to_string())]),
        InMemoryHookRunner::new(),
    );

    let manifest = generator.generate_manifest(&redis_generate_params()).await.unwrap();
    let a = manifest["a"].as_str().unwrap();
    let b = manifest["b"].as_str().unwrap();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36, "expected a UUID, got {a}");
}

/// A password bound with `set` is shared by every group that uses it.
#[tokio::test]
async fn test_shared_password_across_groups() {
    let manifest = redis_generator().generate_manifest(&redis_generate_params()).await.unwrap();

    let password = |group: &str| {
        let path = format!("/instance_groups/name={group}/jobs/0/properties/redis/password");
        lookup(&manifest, &path).unwrap().clone()
    };
    let leader = password("redis_leader");
    let slave = password("redis_slave");
    assert_eq!(leader, slave);
}

/// The manifest survives the trip to YAML and back unchanged.
#[tokio::test]
async fn test_manifest_yaml_output() {
    let generator = redis_generator()
        .with_secret_generator(Arc::new(FixedSecretGenerator("s3cret".to_string())));
    let manifest = generator.generate_manifest(&redis_generate_params()).await.unwrap();

    let yaml = serde_yaml::to_string(&to_native(&manifest)).unwrap();
    assert!(yaml.starts_with("name: redis\n"), "{yaml}");

    let reparsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(reparsed, manifest);
}

#[tokio::test]
async fn test_previous_inputs_visible_to_template() {
    let template = r#"name: {{ deployment.deployment_name }}
previous_name: {{ previousManifest.name | default(value="none") }}
previous_plan: {{ previousPlan.properties.name | default(value="none") }}
"#;
    let generator = ManifestGenerator::new(
        BTreeMap::from([(REDIS_PLAN_NAME.to_string(), template.to_string())]),
        InMemoryHookRunner::new(),
    );

    let mut params = redis_generate_params();
    let first = generator.generate_manifest(&params).await.unwrap();
    assert_eq!(first["previous_name"], "none");
    assert_eq!(first["previous_plan"], "none");

    params.previous_manifest = Some(serde_yaml::from_str("name: redis-old\n").unwrap());
    params.previous_plan = Some(params.plan.clone());
    let second = generator.generate_manifest(&params).await.unwrap();
    assert_eq!(second["previous_name"], "redis-old");
    assert_eq!(second["previous_plan"], REDIS_PLAN_NAME);
}

#[tokio::test]
async fn test_update_block_follows_plan() {
    let mut params = redis_generate_params();
    params.plan.update = Some(UpdatePolicy {
        canaries: 2,
        max_in_flight: MaxInFlight::Percentage("50%".to_string()),
        canary_watch_time: "1000-5000".to_string(),
        update_watch_time: "1000-5000".to_string(),
        serial: Some(true),
    });

    let manifest = redis_generator().generate_manifest(&params).await.unwrap();
    assert_eq!(
        manifest["update"],
        json!({
            "canaries": 2,
            "max_in_flight": "50%",
            "canary_watch_time": "1000-5000",
            "update_watch_time": "1000-5000",
            "serial": true
        })
    );
}

#[tokio::test]
async fn test_unknown_plan_is_reported() {
    let mut params = redis_generate_params();
    params.plan.properties.insert("name".to_string(), json!("some-plam"));

    let err = redis_generator().generate_manifest(&params).await.unwrap_err();
    match err {
        AdapterError::UnknownPlan {
            name,
            available,
        } => {
            assert_eq!(name, "some-plam");
            assert_eq!(available, vec![REDIS_PLAN_NAME.to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_instance_group_is_function_error() {
    let mut params = redis_generate_params();
    params.plan.instance_groups.retain(|group| group.name != "redis_slave");

    let err = redis_generator().generate_manifest(&params).await.unwrap_err();
    match err {
        AdapterError::TemplateFunction {
            source: FunctionError::InstanceGroupNotFound {
                name,
            },
            ..
        } => assert_eq!(name, "redis_slave"),
        other => panic!("unexpected error: {other:?}"),
    }
}
