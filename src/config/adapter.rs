//! The adapter configuration file.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::adapter::{Binder, ManifestGenerator};
use crate::core::AdapterError;
use crate::hooks::ScriptHookRunner;

/// Where a template body comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateSource {
    /// Template file; relative paths are resolved against the config file's directory
    Path(PathBuf),
    /// Template body written directly in the config file
    Inline {
        inline: String,
    },
}

impl TemplateSource {
    /// Read the template body.
    pub async fn load(&self) -> Result<String> {
        match self {
            Self::Inline {
                inline,
            } => Ok(inline.clone()),
            Self::Path(path) => fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read template from {}", path.display())),
        }
    }

    fn relative_to(self, base: &Path) -> Self {
        match self {
            Self::Path(path) if path.is_relative() => Self::Path(base.join(path)),
            other => other,
        }
    }
}

/// Hook scripts run around each operation. Empty paths disable a hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookScripts {
    pub pre_manifest_generation: String,
    pub post_manifest_generation: String,
    pub pre_binding: String,
    pub post_binding: String,
    /// Kill hooks running longer than this many seconds; unset waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl HookScripts {
    fn expanded(self) -> Result<Self, AdapterError> {
        Ok(Self {
            pre_manifest_generation: expand_path(&self.pre_manifest_generation)?,
            post_manifest_generation: expand_path(&self.post_manifest_generation)?,
            pre_binding: expand_path(&self.pre_binding)?,
            post_binding: expand_path(&self.post_binding)?,
            timeout_secs: self.timeout_secs,
        })
    }
}

/// Expand `~` and environment variables in a hook path.
fn expand_path(path: &str) -> Result<String, AdapterError> {
    shellexpand::full(path).map(Cow::into_owned).map_err(|e| AdapterError::Config {
        message: format!("Cannot expand hook path '{path}': {e}"),
    })
}

/// Templates and hooks of one adapter installation.
///
/// ```toml
/// binding_template = "templates/binding.json.tera"
///
/// [manifest_templates]
/// redis-small = "templates/redis.yml.tera"
/// redis-dev = { inline = "name: {{ deployment.deployment_name }}" }
///
/// [hooks]
/// pre_manifest_generation = "~/hooks/pre-manifest.sh"
/// timeout_secs = 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_template: Option<TemplateSource>,

    /// Manifest template per plan name
    #[serde(default)]
    pub manifest_templates: BTreeMap<String, TemplateSource>,

    #[serde(default)]
    pub hooks: HookScripts,
}

impl AdapterConfig {
    /// Load the configuration from `path`.
    ///
    /// Relative template paths are made absolute against the directory containing
    /// `path`, and hook paths are shell-expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file is not valid TOML or does not match the expected schema
    /// - A hook path refers to an undefined environment variable
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read adapter config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse adapter config from {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        tracing::debug!(
            target: "config",
            "Loaded adapter config from {} with plans [{}]",
            path.display(),
            config.manifest_templates.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        Ok(config.resolved(base)?)
    }

    fn resolved(self, base: &Path) -> Result<Self, AdapterError> {
        Ok(Self {
            binding_template: self.binding_template.map(|source| source.relative_to(base)),
            manifest_templates: self
                .manifest_templates
                .into_iter()
                .map(|(plan, source)| (plan, source.relative_to(base)))
                .collect(),
            hooks: self.hooks.expanded()?,
        })
    }

    #[must_use]
    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hooks.timeout_secs.map(Duration::from_secs)
    }

    fn hook_runner(&self) -> ScriptHookRunner {
        ScriptHookRunner::new().with_timeout(self.hook_timeout())
    }

    /// Read every manifest template, keyed by plan name.
    pub async fn load_manifest_templates(&self) -> Result<BTreeMap<String, String>> {
        let mut templates = BTreeMap::new();
        for (plan, source) in &self.manifest_templates {
            let body = source
                .load()
                .await
                .with_context(|| format!("Failed to load manifest template for plan '{plan}'"))?;
            templates.insert(plan.clone(), body);
        }
        Ok(templates)
    }

    /// Manifest generator running the configured hooks as subprocesses.
    pub async fn manifest_generator(&self) -> Result<ManifestGenerator<ScriptHookRunner>> {
        let templates = self.load_manifest_templates().await?;
        Ok(ManifestGenerator::new(templates, self.hook_runner()).with_hooks(
            self.hooks.pre_manifest_generation.clone(),
            self.hooks.post_manifest_generation.clone(),
        ))
    }

    /// Binder running the configured hooks as subprocesses.
    ///
    /// # Errors
    ///
    /// Fails if no binding template is configured or it cannot be read.
    pub async fn binder(&self) -> Result<Binder<ScriptHookRunner>> {
        let source = self.binding_template.as_ref().ok_or_else(|| AdapterError::Config {
            message: "No binding_template configured".to_string(),
        })?;
        let template = source.load().await.context("Failed to load binding template")?;
        Ok(Binder::new(template, self.hook_runner())
            .with_hooks(self.hooks.pre_binding.clone(), self.hooks.post_binding.clone()))
    }
}
