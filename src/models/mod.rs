//! Data models exchanged with the on-demand broker.
//!
//! Inbound shapes ([`Plan`], [`ServiceDeployment`], [`BoshVms`], request parameters)
//! follow the JSON the broker hands to a service adapter. Outbound shapes are the
//! manifest sub-blocks assembled from them ([`ManifestRelease`], [`ManifestStemcell`],
//! [`ManifestUpdate`], [`ManifestInstanceGroup`]) and the [`Binding`] document returned
//! to the broker.

pub mod binding;
pub mod deployment;
pub mod manifest;
pub mod params;
pub mod plan;

pub use binding::{Binding, BoshVms};
pub use deployment::{ServiceDeployment, ServiceRelease, Stemcell};
pub use manifest::{
    ManifestInstanceGroup, ManifestNetwork, ManifestRelease, ManifestStemcell, ManifestUpdate,
};
pub use params::{
    CreateBindingParams, DeleteBindingParams, GenerateManifestParams, RequestParameters,
};
pub use plan::{InstanceGroup, MaxInFlight, Plan, UpdatePolicy};
