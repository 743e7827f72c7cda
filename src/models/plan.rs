//! Service plan definition.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::PLAN_NAME_PROPERTY;

/// A plan offered by the broker: free-form properties, the instance groups to deploy
/// and an optional update policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Arbitrary plan properties. The `name` entry selects the manifest template.
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Instance groups declared by the plan
    #[serde(default)]
    pub instance_groups: Vec<InstanceGroup>,

    /// Explicit update policy; a default one is synthesized when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdatePolicy>,
}

impl Plan {
    /// The plan name from the properties bag, if present and a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.properties.get(PLAN_NAME_PROPERTY).and_then(Value::as_str)
    }

    /// Find an instance group by exact name.
    #[must_use]
    pub fn instance_group(&self, name: &str) -> Option<&InstanceGroup> {
        self.instance_groups.iter().find(|group| group.name == name)
    }
}

/// Instance group as declared in a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceGroup {
    pub name: String,
    pub vm_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vm_extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disk_type: Option<String>,
    pub instances: u32,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub azs: Vec<String>,
    /// `service` or `errand`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<String>,
}

/// Rolling update settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePolicy {
    pub canaries: u32,
    pub max_in_flight: MaxInFlight,
    pub canary_watch_time: String,
    pub update_watch_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<bool>,
}

/// `max_in_flight` is either an absolute count or a percentage such as `"25%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxInFlight {
    Count(u64),
    Percentage(String),
}

impl Default for MaxInFlight {
    fn default() -> Self {
        Self::Count(1)
    }
}
