//! Service deployment description supplied by the broker.

use serde::{Deserialize, Serialize};

/// Releases and stemcells available to a service deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeployment {
    pub deployment_name: String,
    #[serde(default)]
    pub releases: Vec<ServiceRelease>,
    #[serde(default)]
    pub stemcells: Vec<Stemcell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRelease {
    pub name: String,
    pub version: String,
    /// Jobs the release provides
    #[serde(default)]
    pub jobs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stemcell {
    #[serde(rename = "stemcell_os")]
    pub os: String,
    #[serde(rename = "stemcell_version")]
    pub version: String,
}
