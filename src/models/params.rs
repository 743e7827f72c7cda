//! Inputs of the three adapter operations.

use serde_json::{Map, Value};

use super::binding::BoshVms;
use super::deployment::ServiceDeployment;
use super::plan::Plan;
use crate::document::NativeDocument;

/// Arbitrary parameters passed by the user when provisioning or binding.
pub type RequestParameters = Map<String, Value>;

/// Everything needed to render a deployment manifest.
#[derive(Debug, Clone, Default)]
pub struct GenerateManifestParams {
    pub service_deployment: ServiceDeployment,
    pub plan: Plan,
    pub request_params: RequestParameters,
    /// Manifest of the currently deployed instance, on updates
    pub previous_manifest: Option<NativeDocument>,
    /// Plan the instance is migrating from, on plan changes
    pub previous_plan: Option<Plan>,
}

/// Everything needed to render binding credentials.
#[derive(Debug, Clone, Default)]
pub struct CreateBindingParams {
    pub binding_id: String,
    pub deployment_topology: BoshVms,
    /// The deployed manifest, as decoded from YAML
    pub manifest: NativeDocument,
    pub request_params: RequestParameters,
}

/// Addressing information for a binding being removed.
#[derive(Debug, Clone, Default)]
pub struct DeleteBindingParams {
    pub binding_id: String,
    pub deployment_topology: BoshVms,
    pub manifest: NativeDocument,
    pub request_params: RequestParameters,
}
