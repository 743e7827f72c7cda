//! The adapter operations: manifest generation and binding management.
//!
//! Both pipelines follow the same shape:
//!
//! 1. build a [`RenderContext`](crate::templating::RenderContext) from the inputs
//! 2. run the pre-hook and store its output as `generatedParams`
//! 3. render the template
//! 4. parse the output (YAML for manifests, JSON for bindings)
//! 5. store the result in the context and run the post-hook
//!
//! Any failure ends the operation; no partial manifest or binding is returned.

pub mod binder;
pub mod manifest;

pub use binder::{Binder, BindingRemoval};
pub use manifest::ManifestGenerator;
