//! Binding output and the VM topology bindings are computed from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Instance group name to the IP addresses of its VMs.
pub type BoshVms = BTreeMap<String, Vec<String>>;

/// Credentials and endpoints handed to an application bound to the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub credentials: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_service_url: Option<String>,
}
