//! Adapter configuration.
//!
//! One TOML file names the templates and hook scripts of an adapter installation. The
//! CLI takes its path from `--config` or the `TEMPLATE_ADAPTER_CONFIG` environment
//! variable.
//!
//! ```toml
//! # Path relative to this file, or { inline = "..." }
//! binding_template = "templates/binding.json.tera"
//!
//! [manifest_templates]
//! redis-small = "templates/redis-small.yml.tera"
//! redis-large = "templates/redis-large.yml.tera"
//!
//! [hooks]
//! pre_manifest_generation = "~/hooks/pre-manifest.sh"
//! post_manifest_generation = ""
//! pre_binding = "$HOOKS_DIR/pre-binding.sh"
//! post_binding = ""
//! timeout_secs = 300
//! ```
//!
//! Hook paths go through `~` and `$VAR` expansion when the file is loaded. Leaving out
//! `timeout_secs` lets hooks run for as long as they need.

mod adapter;

pub use adapter::{AdapterConfig, HookScripts, TemplateSource};
