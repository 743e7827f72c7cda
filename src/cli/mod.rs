//! Command-line interface invoked by the on-demand service broker.
//!
//! The broker calls the adapter once per operation, passing every input as a
//! positional argument. JSON arguments use the broker's field names; manifests are
//! YAML. Results go to stdout and logs to stderr, so the broker can read the output
//! unmixed.
//!
//! ```bash
//! template-service-adapter --config adapter.toml generate-manifest \
//!     "$SERVICE_DEPLOYMENT_JSON" "$PLAN_JSON" "$REQUEST_PARAMS_JSON" \
//!     "$PREVIOUS_MANIFEST_YAML" "$PREVIOUS_PLAN_JSON"
//!
//! template-service-adapter --config adapter.toml create-binding \
//!     "$BINDING_ID" "$BOSH_VMS_JSON" "$MANIFEST_YAML" "$REQUEST_PARAMS_JSON"
//! ```
//!
//! Optional arguments that are missing, empty or the literal `null` are treated as
//! absent. `dashboard-url` is not offered and exits with status 10.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use crate::config::AdapterConfig;
use crate::constants::CONFIG_ENV_VAR;
use crate::core::AdapterError;
use crate::document::{NativeDocument, to_native};
use crate::models::{
    BoshVms, CreateBindingParams, DeleteBindingParams, GenerateManifestParams, RequestParameters,
};

/// Render BOSH manifests and service bindings from templates.
#[derive(Parser, Debug)]
#[command(
    name = "template-service-adapter",
    version,
    about = "Render BOSH manifests and service bindings from templates",
    long_about = "A service adapter for the on-demand service broker. Deployment manifests and \
                  binding credentials are rendered from Tera templates named in the adapter \
                  configuration, optionally enriched by pre/post hook scripts."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Adapter configuration file.
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Log debug output to stderr, including rendered templates and hook output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the deployment manifest for a service instance.
    GenerateManifest(GenerateManifestArgs),

    /// Render credentials for a new binding.
    CreateBinding(BindingArgs),

    /// Remove a binding. Nothing needs cleaning up, so this only logs.
    DeleteBinding(BindingArgs),

    /// Not offered by this adapter.
    DashboardUrl {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        args: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct GenerateManifestArgs {
    /// Service deployment JSON (deployment name, releases, stemcells)
    service_deployment: String,
    /// Plan JSON
    plan: String,
    /// Request parameters JSON
    request_params: String,
    /// Manifest of the running deployment, YAML
    previous_manifest: Option<String>,
    /// Previous plan JSON
    previous_plan: Option<String>,
}

impl GenerateManifestArgs {
    fn into_params(self) -> Result<GenerateManifestParams> {
        Ok(GenerateManifestParams {
            service_deployment: parse_json("service deployment", &self.service_deployment)?,
            plan: parse_json("plan", &self.plan)?,
            request_params: parse_request_params(Some(&self.request_params))?,
            previous_manifest: present(self.previous_manifest.as_deref())
                .map(|raw| parse_yaml("previous manifest", raw))
                .transpose()?,
            previous_plan: present(self.previous_plan.as_deref())
                .map(|raw| parse_json("previous plan", raw))
                .transpose()?,
        })
    }
}

#[derive(Args, Debug)]
struct BindingArgs {
    /// Binding ID
    binding_id: String,
    /// BOSH VMs JSON (instance group name to IP addresses)
    bosh_vms: String,
    /// Deployed manifest, YAML
    manifest: String,
    /// Request parameters JSON
    request_params: Option<String>,
}

impl BindingArgs {
    fn parse(&self) -> Result<(BoshVms, NativeDocument, RequestParameters)> {
        Ok((
            parse_json("BOSH VMs", &self.bosh_vms)?,
            parse_yaml("manifest", &self.manifest)?,
            parse_request_params(self.request_params.as_deref())?,
        ))
    }

    fn into_create_params(self) -> Result<CreateBindingParams> {
        let (deployment_topology, manifest, request_params) = self.parse()?;
        Ok(CreateBindingParams {
            binding_id: self.binding_id,
            deployment_topology,
            manifest,
            request_params,
        })
    }

    fn into_delete_params(self) -> Result<DeleteBindingParams> {
        let (deployment_topology, manifest, request_params) = self.parse()?;
        Ok(DeleteBindingParams {
            binding_id: self.binding_id,
            deployment_topology,
            manifest,
            request_params,
        })
    }
}

/// `None` for arguments that are missing, blank or `null`.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|raw| !raw.is_empty() && *raw != "null")
}

fn parse_json<T: DeserializeOwned>(what: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("Invalid {what} JSON argument"))
}

fn parse_yaml(what: &str, raw: &str) -> Result<NativeDocument> {
    serde_yaml::from_str(raw).with_context(|| format!("Invalid {what} YAML argument"))
}

fn parse_request_params(raw: Option<&str>) -> Result<RequestParameters> {
    match present(raw) {
        Some(raw) => parse_json("request parameters", raw),
        None => Ok(RequestParameters::new()),
    }
}

impl Cli {
    /// Log filter from the verbosity flags; `RUST_LOG` takes precedence when set.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }
        let level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };
        EnvFilter::new(level)
    }

    /// Send logs to stderr; stdout is reserved for operation output.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(false)
            .try_init();
    }

    /// Run the command and print its output.
    pub async fn execute(self) -> Result<()> {
        if let Some(output) = self.run().await? {
            print!("{output}");
        }
        Ok(())
    }

    /// Run the command and return what it would print.
    pub async fn run(self) -> Result<Option<String>> {
        if let Commands::DashboardUrl {
            args,
        } = &self.command
        {
            tracing::debug!(target: "cli", "dashboard-url called with {} arguments", args.len());
            return Err(AdapterError::NotImplemented {
                operation: "dashboard-url".to_string(),
            }
            .into());
        }

        let config_path = self.config.ok_or_else(|| AdapterError::Config {
            message: format!("No configuration file given; pass --config or set {CONFIG_ENV_VAR}"),
        })?;
        let config = AdapterConfig::load_from(&config_path).await?;

        match self.command {
            Commands::GenerateManifest(args) => {
                let params = args.into_params()?;
                let generator = config.manifest_generator().await?;
                let manifest = generator.generate_manifest(&params).await?;
                let yaml = serde_yaml::to_string(&to_native(&manifest))
                    .context("Failed to encode the manifest as YAML")?;
                Ok(Some(yaml))
            }
            Commands::CreateBinding(args) => {
                let params = args.into_create_params()?;
                let binding = config.binder().await?.create_binding(&params).await?;
                let json =
                    serde_json::to_string(&binding).context("Failed to encode the binding")?;
                Ok(Some(json))
            }
            Commands::DeleteBinding(args) => {
                let params = args.into_delete_params()?;
                config.binder().await?.delete_binding(&params)?;
                Ok(None)
            }
            Commands::DashboardUrl {
                ..
            } => Ok(None),
        }
    }
}
