//! Sample broker inputs and templates for a small Redis service.
//!
//! The plan `some-plan` has a `redis_leader` and a `redis_slave` instance group; the
//! manifest template adds the slaves only when the request parameters ask for them.

use serde_json::json;

use crate::document::NativeDocument;
use crate::models::{
    BoshVms, CreateBindingParams, GenerateManifestParams, InstanceGroup, Plan, ServiceDeployment,
    ServiceRelease, Stemcell,
};

/// Plan name the fixtures register their manifest template under.
pub const REDIS_PLAN_NAME: &str = "some-plan";

/// Manifest template for [`REDIS_PLAN_NAME`].
pub const REDIS_MANIFEST_TEMPLATE: &str = r#"{% set password = gen_password() %}
name: {{ deployment.deployment_name }}

{{ get_releases_block() }}
{{ get_stemcells_block() }}
{{ get_update_block() }}
instance_groups:
{{ get_instance_group(name="redis_leader") }}
  jobs:
  - name: redis
    release: redis
    properties:
      redis:
        password: {{ password }}
{% if params.use_slave_instances | default(value=false) %}
{{ get_instance_group(name="redis_slave") }}
  jobs:
  - name: redis
    release: redis
    properties:
      redis:
        master:
        password: {{ password }}
{% endif %}
"#;

/// Binding template reading the leader address and the Redis password.
pub const REDIS_BINDING_TEMPLATE: &str = r#"{"credentials": {
  "host": "{{ get_from_deployment(path="/redis_leader/0") }}",
  "password": "{{ get_from_manifest(path="/instance_groups/name=redis_leader/jobs/name=redis/properties/redis/password") }}",
  "port": 58301
}}"#;

#[must_use]
pub fn redis_service_deployment() -> ServiceDeployment {
    ServiceDeployment {
        deployment_name: "redis".to_string(),
        releases: vec![ServiceRelease {
            name: "redis".to_string(),
            version: "123".to_string(),
            jobs: vec!["redis".to_string(), "redis_slave".to_string()],
        }],
        stemcells: vec![Stemcell {
            os: "ubuntu-trusty".to_string(),
            version: "123".to_string(),
        }],
    }
}

fn redis_group(name: &str, instances: u32) -> InstanceGroup {
    InstanceGroup {
        name: name.to_string(),
        vm_type: "medium".to_string(),
        persistent_disk_type: Some("large".to_string()),
        instances,
        networks: vec!["default".to_string()],
        azs: vec!["z1".to_string()],
        ..InstanceGroup::default()
    }
}

/// Plan named [`REDIS_PLAN_NAME`] with one leader and two slaves, no update policy.
#[must_use]
pub fn redis_plan() -> Plan {
    let mut plan = Plan {
        instance_groups: vec![redis_group("redis_leader", 1), redis_group("redis_slave", 2)],
        ..Plan::default()
    };
    plan.properties.insert("name".to_string(), json!(REDIS_PLAN_NAME));
    plan
}

/// Manifest generation request asking for slave instances.
#[must_use]
pub fn redis_generate_params() -> GenerateManifestParams {
    let mut params = GenerateManifestParams {
        service_deployment: redis_service_deployment(),
        plan: redis_plan(),
        ..GenerateManifestParams::default()
    };
    params.request_params.insert("use_slave_instances".to_string(), json!(true));
    params
}

/// A deployed manifest whose leader job carries the Redis password.
///
/// # Panics
///
/// Never; the embedded YAML is valid.
#[must_use]
pub fn redis_deployed_manifest(password: &str) -> NativeDocument {
    let yaml = format!(
        r"name: redis
instance_groups:
- name: redis_leader
  instances: 1
  jobs:
  - name: redis
    release: redis
    properties:
      redis:
        password: {password}
"
    );
    serde_yaml::from_str(&yaml).expect("fixture manifest is valid YAML")
}

#[must_use]
pub fn redis_topology() -> BoshVms {
    BoshVms::from([("redis_leader".to_string(), vec!["127.0.0.1".to_string()])])
}

#[must_use]
pub fn redis_binding_params() -> CreateBindingParams {
    CreateBindingParams {
        binding_id: "binding-1".to_string(),
        deployment_topology: redis_topology(),
        manifest: redis_deployed_manifest("password"),
        ..CreateBindingParams::default()
    }
}
