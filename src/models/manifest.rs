//! Manifest sub-blocks produced by the assembly helpers.
//!
//! Field order matches the order BOSH documentation uses, which is also the order the
//! fragments are emitted in.

use serde::{Deserialize, Serialize};

use super::plan::MaxInFlight;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRelease {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStemcell {
    pub alias: String,
    pub os: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestUpdate {
    pub canaries: u32,
    pub max_in_flight: MaxInFlight,
    pub canary_watch_time: String,
    pub update_watch_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNetwork {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInstanceGroup {
    pub name: String,
    pub instances: u32,
    pub vm_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vm_extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disk_type: Option<String>,
    pub stemcell: String,
    pub networks: Vec<ManifestNetwork>,
    pub azs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<String>,
}
