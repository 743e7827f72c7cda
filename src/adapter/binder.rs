//! Binding credential generation.

use crate::core::AdapterError;
use crate::document::{Document, normalize};
use crate::hooks::{self, HookRunner};
use crate::models::{Binding, BoshVms, CreateBindingParams, DeleteBindingParams};
use crate::templating::{
    Capability, ContextKey, FunctionRegistry, PathFunction, RenderContext, TemplateRenderer,
};

/// Template name used in binding errors and logs.
const BINDING_TEMPLATE_NAME: &str = "binding";

/// Outcome of removing a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindingRemoval {
    /// Bindings own no external resources; nothing was done.
    NoCleanupRequired,
}

/// Renders binding credentials from a single JSON template.
///
/// The template reads the deployed manifest and VM topology through
/// `get_from_manifest(path=...)` and `get_from_deployment(path=...)`.
pub struct Binder<R> {
    template: String,
    pre_hook: String,
    post_hook: String,
    runner: R,
}

impl<R: HookRunner> Binder<R> {
    pub fn new(template: impl Into<String>, runner: R) -> Self {
        Self {
            template: template.into(),
            pre_hook: String::new(),
            post_hook: String::new(),
            runner,
        }
    }

    /// Set the pre- and post-binding hook scripts. Empty paths disable a hook.
    #[must_use]
    pub fn with_hooks(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre_hook = pre.into();
        self.post_hook = post.into();
        self
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Render and parse the binding for `params`.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::Conversion`] when the manifest cannot be normalized
    /// - [`AdapterError::Hook`] when either hook fails
    /// - [`AdapterError::Path`] when the template reads a missing path
    /// - [`AdapterError::BindingParse`] when the rendered text is not a binding object
    pub async fn create_binding(
        &self,
        params: &CreateBindingParams,
    ) -> Result<Binding, AdapterError> {
        tracing::info!(target: "adapter", "Creating binding. id: {}", params.binding_id);

        let manifest = normalize(params.manifest.clone())?;
        let topology = normalize_topology(&params.deployment_topology)?;

        let registry = FunctionRegistry::new()
            .with(Capability::Path(PathFunction::new(PathFunction::MANIFEST, manifest.clone())))
            .with(Capability::Path(PathFunction::new(PathFunction::DEPLOYMENT, topology.clone())));
        let renderer = TemplateRenderer::new(registry);

        let mut context = RenderContext::new();
        context.insert(ContextKey::Deployment, &topology)?;
        context.insert(ContextKey::Manifest, &manifest)?;
        context.insert(ContextKey::BindingId, &params.binding_id)?;
        context.insert(ContextKey::Params, &params.request_params)?;

        let generated = hooks::invoke(&self.runner, &self.pre_hook, &context.to_document()).await?;
        context.insert(ContextKey::GeneratedParams, &generated)?;

        let rendered = renderer.render(BINDING_TEMPLATE_NAME, &self.template, &context)?;
        tracing::info!(target: "adapter", "Binding:\n{}", rendered);

        let binding: Binding = serde_json::from_str(&rendered).map_err(|source| {
            AdapterError::BindingParse {
                source,
            }
        })?;
        context.insert(ContextKey::Binding, &binding)?;

        hooks::invoke(&self.runner, &self.post_hook, &context.to_document()).await?;

        Ok(binding)
    }

    /// Remove a binding. Always succeeds without side effects.
    pub fn delete_binding(
        &self,
        params: &DeleteBindingParams,
    ) -> Result<BindingRemoval, AdapterError> {
        tracing::info!(
            target: "adapter",
            "Deleting binding. id: {} (no cleanup required)",
            params.binding_id
        );
        Ok(BindingRemoval::NoCleanupRequired)
    }
}

/// The VM topology in canonical form.
fn normalize_topology(topology: &BoshVms) -> Result<Document, AdapterError> {
    let native = serde_yaml::to_value(topology).map_err(|source| AdapterError::YamlEncoding {
        what: "the deployment topology".to_string(),
        source,
    })?;
    Ok(normalize(native)?)
}

impl<R: std::fmt::Debug> std::fmt::Debug for Binder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("pre_hook", &self.pre_hook)
            .field("post_hook", &self.post_hook)
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}
