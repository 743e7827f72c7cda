//! Deployment manifest generation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::AdapterError;
use crate::document::{Document, NativeDocument, normalize};
use crate::hooks::{self, HookRunner};
use crate::models::GenerateManifestParams;
use crate::templating::blocks::{self, named_block};
use crate::templating::{
    BlockFunction, Capability, ContextKey, FunctionRegistry, InstanceGroupFunction, RenderContext,
    SecretFunction, SecretGenerator, TemplateRenderer, UuidSecretGenerator,
};

/// Renders BOSH deployment manifests from per-plan templates.
///
/// The plan's `name` property picks the template. The pre-manifest hook runs before
/// rendering and its output is visible to the template as `generatedParams`; the
/// post-manifest hook sees the finished manifest under `manifest`.
pub struct ManifestGenerator<R> {
    templates: BTreeMap<String, String>,
    pre_hook: String,
    post_hook: String,
    runner: R,
    secrets: Arc<dyn SecretGenerator>,
}

impl<R: HookRunner> ManifestGenerator<R> {
    /// Generator for `templates` (plan name to template body) without hooks.
    pub fn new(templates: BTreeMap<String, String>, runner: R) -> Self {
        Self {
            templates,
            pre_hook: String::new(),
            post_hook: String::new(),
            runner,
            secrets: Arc::new(UuidSecretGenerator),
        }
    }

    /// Set the pre- and post-generation hook scripts. Empty paths disable a hook.
    #[must_use]
    pub fn with_hooks(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre_hook = pre.into();
        self.post_hook = post.into();
        self
    }

    /// Replace the source of `gen_password()` credentials.
    #[must_use]
    pub fn with_secret_generator(mut self, secrets: Arc<dyn SecretGenerator>) -> Self {
        self.secrets = secrets;
        self
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Render, parse and normalize the manifest for `params`.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::MissingPlanName`] / [`AdapterError::UnknownPlan`] when no template
    ///   can be selected
    /// - [`AdapterError::Hook`] when either hook fails
    /// - template errors from rendering
    /// - [`AdapterError::ManifestParse`] when the rendered text is not YAML
    /// - [`AdapterError::Conversion`] when the parsed manifest cannot be normalized
    pub async fn generate_manifest(
        &self,
        params: &GenerateManifestParams,
    ) -> Result<Document, AdapterError> {
        let plan_name = params.plan.name().ok_or(AdapterError::MissingPlanName)?;
        tracing::info!(target: "adapter", "Generating manifest. plan: {}", plan_name);

        let template = self.templates.get(plan_name).ok_or_else(|| AdapterError::UnknownPlan {
            name: plan_name.to_string(),
            available: self.templates.keys().cloned().collect(),
        })?;
        let renderer = TemplateRenderer::new(self.registry(params)?);

        let previous_manifest =
            params.previous_manifest.clone().map(normalize).transpose()?;

        let mut context = RenderContext::new();
        context.insert(ContextKey::Params, &params.request_params)?;
        context.insert(ContextKey::Deployment, &params.service_deployment)?;
        context.insert(ContextKey::Plan, &params.plan)?;
        context.insert(ContextKey::PreviousPlan, &params.previous_plan)?;
        context.insert(ContextKey::PreviousManifest, &previous_manifest)?;

        let generated = hooks::invoke(&self.runner, &self.pre_hook, &context.to_document()).await?;
        context.insert(ContextKey::GeneratedParams, &generated)?;

        let rendered = renderer.render(plan_name, template, &context)?;
        tracing::info!(target: "adapter", "Manifest:\n{}", rendered);

        let native: NativeDocument = serde_yaml::from_str(&rendered).map_err(|source| {
            AdapterError::ManifestParse {
                source,
            }
        })?;
        let manifest = normalize(native)?;
        context.insert(ContextKey::Manifest, &manifest)?;

        // Post-hook output is not merged anywhere; only its failure matters
        hooks::invoke(&self.runner, &self.post_hook, &context.to_document()).await?;

        Ok(manifest)
    }

    /// Functions available to the template for `params`.
    ///
    /// The release, stemcell and update blocks are rendered up front; instance groups are
    /// rendered when the template asks for them.
    pub fn registry(&self, params: &GenerateManifestParams) -> Result<FunctionRegistry, AdapterError> {
        let releases =
            named_block("releases", &blocks::releases(&params.service_deployment.releases), "")
                .map_err(yaml_error("releases"))?;
        let stemcells =
            named_block("stemcells", &blocks::stemcells(&params.service_deployment.stemcells), "")
                .map_err(yaml_error("stemcells"))?;
        let update = named_block("update", &blocks::update(params.plan.update.as_ref()), "  ")
            .map_err(yaml_error("update"))?;

        // Every instance group runs on the first declared stemcell
        let stemcell = blocks::stemcell_alias(0);

        Ok(FunctionRegistry::new()
            .with(Capability::Secret(SecretFunction::new(Arc::clone(&self.secrets))))
            .with(Capability::InstanceGroup(InstanceGroupFunction::new(
                params.plan.clone(),
                stemcell,
            )))
            .with(Capability::Block(BlockFunction::new(BlockFunction::RELEASES, releases)))
            .with(Capability::Block(BlockFunction::new(BlockFunction::STEMCELLS, stemcells)))
            .with(Capability::Block(BlockFunction::new(BlockFunction::UPDATE, update))))
    }
}

fn yaml_error(block: &str) -> impl FnOnce(serde_yaml::Error) -> AdapterError {
    let what = format!("the {block} block");
    move |source| AdapterError::YamlEncoding {
        what,
        source,
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for ManifestGenerator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestGenerator")
            .field("plans", &self.templates.keys().collect::<Vec<_>>())
            .field("pre_hook", &self.pre_hook)
            .field("post_hook", &self.post_hook)
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}
