//! Template service adapter for the BOSH on-demand service broker.
//!
//! The broker delegates three decisions to a service adapter: what a service
//! instance's BOSH deployment manifest looks like, which credentials a binding
//! receives, and what happens when a binding is removed. This adapter answers them by
//! rendering operator-supplied [Tera](https://keats.github.io/tera/) templates.
//!
//! # Architecture Overview
//!
//! - [`document`] - the canonical document model: structural normalization of decoded
//!   YAML/JSON and slash-path lookup
//! - [`models`] - broker data shapes (plans, service deployments, VM topology, bindings)
//! - [`templating`] - render context, template functions and the renderer
//! - [`hooks`] - optional pre/post hook scripts exchanging JSON with the adapter
//! - [`adapter`] - the manifest generation and binding pipelines
//! - [`config`] - the TOML file naming templates and hooks
//! - [`cli`] - the command line the broker invokes
//! - [`core`] - error types and terminal error reporting
//!
//! # Manifest generation
//!
//! The manifest template is chosen by the plan's `name` property. It can read the
//! inputs directly (`deployment`, `plan`, `params`, `previousPlan`,
//! `previousManifest`, `generatedParams`) and call helper functions that emit
//! ready-made YAML blocks:
//!
//! ```yaml
//! name: {{ deployment.deployment_name }}
//! {{ get_releases_block() }}
//! {{ get_stemcells_block() }}
//! {{ get_update_block() }}
//! instance_groups:
//! {{ get_instance_group(name="redis") }}
//! properties:
//!   password: {{ gen_password() }}
//! ```
//!
//! # Bindings
//!
//! The binding template renders JSON and reads values from the deployed manifest and
//! VM topology by path:
//!
//! ```json
//! {"credentials": {"host": "{{ get_from_deployment(path="/redis/0") }}",
//!                  "password": "{{ get_from_manifest(path="/properties/password") }}"}}
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod hooks;
pub mod models;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
