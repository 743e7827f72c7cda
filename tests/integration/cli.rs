//! The compiled binary as the broker invokes it.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use template_service_adapter::test_utils::fixtures::{
    REDIS_BINDING_TEMPLATE, REDIS_MANIFEST_TEMPLATE, redis_deployed_manifest, redis_plan,
    redis_service_deployment, redis_topology,
};
use tempfile::TempDir;

/// Adapter installation with the Redis templates on disk.
struct Installation {
    _temp: TempDir,
    config: PathBuf,
}

impl Installation {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let templates = temp.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("redis.yml.tera"), REDIS_MANIFEST_TEMPLATE).unwrap();
        std::fs::write(templates.join("binding.json.tera"), REDIS_BINDING_TEMPLATE).unwrap();

        let config = temp.path().join("adapter.toml");
        std::fs::write(
            &config,
            r#"binding_template = "templates/binding.json.tera"

[manifest_templates]
some-plan = "templates/redis.yml.tera"
"#,
        )
        .unwrap();

        Self {
            _temp: temp,
            config,
        }
    }

    fn command(&self) -> Command {
        adapter_command(&self.config)
    }
}

fn adapter_command(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("template-service-adapter").unwrap();
    cmd.env_remove("RUST_LOG").arg("--config").arg(config);
    cmd
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}

#[test]
fn test_generate_manifest_prints_yaml() {
    let installation = Installation::new();
    let output = installation
        .command()
        .arg("generate-manifest")
        .arg(to_json(&redis_service_deployment()))
        .arg(to_json(&redis_plan()))
        .arg(r#"{"use_slave_instances": true}"#)
        .arg("")
        .arg("null")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let manifest: serde_json::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(manifest["name"], "redis");
    assert_eq!(manifest["instance_groups"].as_array().unwrap().len(), 2);
    assert_eq!(manifest["stemcells"][0]["alias"], "stemcell_0");
}

#[test]
fn test_generate_manifest_logs_to_stderr() {
    let installation = Installation::new();
    installation
        .command()
        .arg("generate-manifest")
        .arg(to_json(&redis_service_deployment()))
        .arg(to_json(&redis_plan()))
        .arg("{}")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generating manifest").not())
        .stderr(predicate::str::contains("Generating manifest. plan: some-plan"));
}

#[test]
fn test_unknown_plan_fails_with_suggestion() {
    let installation = Installation::new();
    let mut plan = redis_plan();
    plan.properties.insert("name".to_string(), serde_json::json!("some-plan2"));

    installation
        .command()
        .arg("generate-manifest")
        .arg(to_json(&redis_service_deployment()))
        .arg(to_json(&plan))
        .arg("{}")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Can't find plan template for name 'some-plan2'"))
        .stderr(predicate::str::contains("Did you mean 'some-plan'?"));
}

#[test]
fn test_create_binding_prints_json() {
    let installation = Installation::new();
    let manifest = serde_yaml::to_string(&redis_deployed_manifest("hunter2")).unwrap();
    let output = installation
        .command()
        .arg("create-binding")
        .arg("binding-1")
        .arg(to_json(&redis_topology()))
        .arg(manifest)
        .arg("{}")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let binding: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        binding,
        serde_json::json!({"credentials": {"host": "127.0.0.1", "password": "hunter2", "port": 58301}})
    );
}

#[test]
fn test_delete_binding_prints_nothing() {
    let installation = Installation::new();
    installation
        .command()
        .arg("delete-binding")
        .arg("binding-1")
        .arg(to_json(&redis_topology()))
        .arg("name: redis\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_dashboard_url_not_implemented() {
    let mut cmd = Command::cargo_bin("template-service-adapter").unwrap();
    cmd.args(["dashboard-url", "instance-1", "{}", "name: redis"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("not implemented"));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    adapter_command(&temp.path().join("missing.toml"))
        .arg("delete-binding")
        .arg("binding-1")
        .arg("{}")
        .arg("name: redis\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read adapter config"));
}

#[test]
fn test_config_from_environment() {
    let installation = Installation::new();
    let mut cmd = Command::cargo_bin("template-service-adapter").unwrap();
    cmd.env("TEMPLATE_ADAPTER_CONFIG", &installation.config)
        .arg("delete-binding")
        .arg("binding-1")
        .arg("{}")
        .arg("name: redis\n")
        .assert()
        .success();
}

#[test]
fn test_invalid_json_argument() {
    let installation = Installation::new();
    installation
        .command()
        .arg("generate-manifest")
        .arg("{not json")
        .arg(to_json(&redis_plan()))
        .arg("{}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid service deployment JSON argument"));
}

#[test]
fn test_malformed_config_suggests_checking_it() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("adapter.toml");
    std::fs::write(&config, "[manifest_templates\n").unwrap();

    adapter_command(&config)
        .arg("delete-binding")
        .arg("binding-1")
        .arg("{}")
        .arg("name: redis\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse adapter config"))
        .stderr(predicate::str::contains("Check the adapter configuration file passed with --config"));
}
