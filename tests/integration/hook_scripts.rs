//! Hooks run as real executables through [`ScriptHookRunner`].

use std::collections::BTreeMap;
use std::time::Duration;

use template_service_adapter::adapter::{Binder, ManifestGenerator};
use template_service_adapter::core::AdapterError;
use template_service_adapter::hooks::{HookError, ScriptHookRunner};
use template_service_adapter::test_utils::fixtures::{
    REDIS_BINDING_TEMPLATE, REDIS_PLAN_NAME, redis_binding_params, redis_generate_params,
};
use template_service_adapter::test_utils::{init_test_logging, write_hook_script};
use tempfile::TempDir;

const REPLICA_TEMPLATE: &str = "name: {{ deployment.deployment_name }}\n\
                                replicas: {{ generatedParams.replicas }}\n";

fn generator(template: &str, runner: ScriptHookRunner) -> ManifestGenerator<ScriptHookRunner> {
    init_test_logging(None);
    ManifestGenerator::new(
        BTreeMap::from([(REDIS_PLAN_NAME.to_string(), template.to_string())]),
        runner,
    )
}

#[tokio::test]
async fn test_pre_and_post_manifest_hooks() {
    let temp = TempDir::new().unwrap();
    let captured = temp.path().join("post-context.json");
    let pre = write_hook_script(temp.path(), "pre.sh", r#"echo '{"replicas": 3}'"#);
    let post = write_hook_script(
        temp.path(),
        "post.sh",
        &format!(r#"printf '%s' "$1" > '{}'"#, captured.display()),
    );

    let manifest = generator(REPLICA_TEMPLATE, ScriptHookRunner::new())
        .with_hooks(pre, post)
        .generate_manifest(&redis_generate_params())
        .await
        .unwrap();
    assert_eq!(manifest["replicas"], 3);

    let context: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&captured).unwrap()).unwrap();
    assert_eq!(context["manifest"], manifest);
    assert_eq!(context["generatedParams"]["replicas"], 3);
    assert_eq!(context["deployment"]["deployment_name"], "redis");
    assert_eq!(context["params"]["use_slave_instances"], true);
}

#[tokio::test]
async fn test_failing_pre_hook_reports_stderr() {
    let temp = TempDir::new().unwrap();
    let pre = write_hook_script(temp.path(), "pre.sh", "echo 'quota exceeded' >&2\nexit 3");

    let err = generator(REPLICA_TEMPLATE, ScriptHookRunner::new())
        .with_hooks(pre, "")
        .generate_manifest(&redis_generate_params())
        .await
        .unwrap_err();
    match err {
        AdapterError::Hook(HookError::Execution {
            code,
            stderr,
            ..
        }) => {
            assert_eq!(code, Some(3));
            assert!(stderr.contains("quota exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_pre_hook_printing_garbage() {
    let temp = TempDir::new().unwrap();
    let pre = write_hook_script(temp.path(), "pre.sh", "echo 'replicas=3'");

    let err = generator(REPLICA_TEMPLATE, ScriptHookRunner::new())
        .with_hooks(pre, "")
        .generate_manifest(&redis_generate_params())
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Hook(HookError::MalformedOutput { .. })), "{err:?}");
}

#[tokio::test]
async fn test_slow_hook_times_out() {
    let temp = TempDir::new().unwrap();
    let pre = write_hook_script(temp.path(), "pre.sh", "sleep 5");
    let runner = ScriptHookRunner::new().with_timeout(Some(Duration::from_secs(1)));

    let err = generator(REPLICA_TEMPLATE, runner)
        .with_hooks(pre, "")
        .generate_manifest(&redis_generate_params())
        .await
        .unwrap_err();
    match err {
        AdapterError::Hook(HookError::TimedOut {
            timeout,
            ..
        }) => assert_eq!(timeout, Duration::from_secs(1)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_binding_hooks() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("post-ran");
    let pre = write_hook_script(temp.path(), "pre.sh", "true");
    let post = write_hook_script(temp.path(), "post.sh", &format!("touch '{}'", marker.display()));

    let binding = Binder::new(REDIS_BINDING_TEMPLATE, ScriptHookRunner::new())
        .with_hooks(pre, post)
        .create_binding(&redis_binding_params())
        .await
        .unwrap();
    assert_eq!(binding.credentials["host"], "127.0.0.1");
    assert!(marker.exists());
}
