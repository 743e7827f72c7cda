//! Template rendering for manifests and bindings.
//!
//! Templates are [Tera](https://keats.github.io/tera/) documents. Each render builds a
//! fresh Tera instance, registers the functions of its [`FunctionRegistry`] and renders
//! the template body against a [`RenderContext`]. HTML autoescaping is off: the output
//! is YAML or JSON, never markup.
//!
//! # Manifest templates
//!
//! ```text
//! {% set password = gen_password() %}
//! name: {{ deployment.deployment_name }}
//!
//! {{ get_releases_block() }}
//! {{ get_stemcells_block() }}
//! {{ get_update_block() }}
//! instance_groups:
//! {{ get_instance_group(name="redis_leader") }}
//!   jobs:
//!   - name: redis
//!     release: redis
//!     properties:
//!       redis:
//!         password: {{ password }}
//! ```
//!
//! Block functions return fragments starting at column 0, so they belong at the start
//! of a line. `get_instance_group` returns a one-element YAML list; lines written right
//! after it at two spaces of indentation extend that list item.
//!
//! # Binding templates
//!
//! ```text
//! {"credentials": {
//!   "host": "{{ get_from_deployment(path="/redis_leader/0") }}",
//!   "password": "{{ get_from_manifest(path="/instance_groups/name=redis_leader/jobs/name=redis/properties/redis/password") }}",
//!   "port": 6379
//! }}
//! ```

pub mod blocks;
pub mod context;
pub mod functions;
pub mod renderer;
pub mod secrets;

pub use context::{ContextKey, RenderContext};
pub use functions::{
    BlockFunction, CallError, CallFailure, Capability, FunctionError, FunctionRegistry,
    InstanceGroupFunction, PathFunction, SecretFunction,
};
pub use renderer::{TemplateRenderer, classify_tera_error, format_tera_error};
pub use secrets::{FixedSecretGenerator, SecretGenerator, UuidSecretGenerator};
