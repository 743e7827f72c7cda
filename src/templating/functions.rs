//! Template functions available to manifest and binding templates.
//!
//! The registry is a closed table of [`Capability`] values. Each render gets a fresh
//! Tera instance and registers the capabilities of its kind:
//!
//! | Function | Kind | Returns |
//! |----------|------|---------|
//! | `gen_password()` | manifest | a fresh credential per call |
//! | `get_instance_group(name=...)` | manifest | a one-element YAML list for the group |
//! | `get_releases_block()` | manifest | `releases:` YAML block |
//! | `get_stemcells_block()` | manifest | `stemcells:` YAML block |
//! | `get_update_block()` | manifest | `update:` YAML block |
//! | `get_from_manifest(path=...)` | binding | scalar at `path` in the manifest |
//! | `get_from_deployment(path=...)` | binding | scalar at `path` in the VM topology |
//!
//! A failing function aborts the whole render. Its typed error travels through Tera's
//! error chain inside a [`CallError`] and is recovered by the renderer.

use std::collections::HashMap;
use std::sync::Arc;

use tera::{Tera, Value};
use thiserror::Error;

use super::blocks;
use super::secrets::SecretGenerator;
use crate::document::{Document, PathError, resolve};
use crate::models::Plan;

/// Failure of a template function, other than a path lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FunctionError {
    #[error("No instance group found with name '{name}'")]
    InstanceGroupNotFound {
        name: String,
    },

    /// An injected [`SecretGenerator`] could not produce a credential. The built-in UUID
    /// generator never fails; generators backed by an external store can.
    #[error("Failed to generate a secret: {reason}")]
    Secret {
        reason: String,
    },

    #[error("Missing required argument '{argument}'")]
    MissingArgument {
        argument: &'static str,
    },

    #[error("Failed to serialize {block} as YAML: {reason}")]
    Serialization {
        block: String,
        reason: String,
    },
}

/// What went wrong inside a function call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Function(#[from] FunctionError),
}

/// Error a capability hands to Tera, carrying the function name for later recovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{function}(): {failure}")]
pub struct CallError {
    pub function: &'static str,
    pub failure: CallFailure,
}

impl CallError {
    fn into_tera(self) -> tera::Error {
        tera::Error::chain(format!("Function '{}' failed", self.function), self)
    }
}

fn string_arg<'a>(
    function: &'static str,
    args: &'a HashMap<String, Value>,
    argument: &'static str,
) -> tera::Result<&'a str> {
    args.get(argument).and_then(Value::as_str).ok_or_else(|| {
        CallError {
            function,
            failure: FunctionError::MissingArgument {
                argument,
            }
            .into(),
        }
        .into_tera()
    })
}

/// `gen_password()`
#[derive(Clone)]
pub struct SecretFunction {
    generator: Arc<dyn SecretGenerator>,
}

impl SecretFunction {
    pub const NAME: &'static str = "gen_password";

    pub fn new(generator: Arc<dyn SecretGenerator>) -> Self {
        Self {
            generator,
        }
    }
}

impl tera::Function for SecretFunction {
    fn call(&self, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.generator.generate().map(Value::String).map_err(|failure| {
            CallError {
                function: Self::NAME,
                failure: failure.into(),
            }
            .into_tera()
        })
    }
}

/// `get_instance_group(name=...)`
#[derive(Debug, Clone)]
pub struct InstanceGroupFunction {
    plan: Arc<Plan>,
    stemcell: String,
}

impl InstanceGroupFunction {
    pub const NAME: &'static str = "get_instance_group";

    /// Groups of `plan` render with `stemcell` as their stemcell alias.
    pub fn new(plan: Plan, stemcell: impl Into<String>) -> Self {
        Self {
            plan: Arc::new(plan),
            stemcell: stemcell.into(),
        }
    }

    /// YAML fragment for the group named `name`.
    pub fn fragment(&self, name: &str) -> Result<String, FunctionError> {
        let group = self.plan.instance_group(name).ok_or_else(|| {
            FunctionError::InstanceGroupNotFound {
                name: name.to_string(),
            }
        })?;
        let rendered = blocks::instance_group(group, &self.stemcell);
        blocks::to_yaml(std::slice::from_ref(&rendered)).map_err(|e| FunctionError::Serialization {
            block: format!("instance group '{name}'"),
            reason: e.to_string(),
        })
    }
}

impl tera::Function for InstanceGroupFunction {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let name = string_arg(Self::NAME, args, "name")?;
        self.fragment(name).map(Value::String).map_err(|failure| {
            CallError {
                function: Self::NAME,
                failure: failure.into(),
            }
            .into_tera()
        })
    }
}

/// A precomputed YAML block (`get_releases_block()` and friends).
#[derive(Debug, Clone)]
pub struct BlockFunction {
    name: &'static str,
    fragment: String,
}

impl BlockFunction {
    pub const RELEASES: &'static str = "get_releases_block";
    pub const STEMCELLS: &'static str = "get_stemcells_block";
    pub const UPDATE: &'static str = "get_update_block";

    pub fn new(name: &'static str, fragment: String) -> Self {
        Self {
            name,
            fragment,
        }
    }
}

impl tera::Function for BlockFunction {
    fn call(&self, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        Ok(Value::String(self.fragment.clone()))
    }
}

/// Path lookup bound to one document (`get_from_manifest`, `get_from_deployment`).
#[derive(Debug, Clone)]
pub struct PathFunction {
    name: &'static str,
    document: Arc<Document>,
}

impl PathFunction {
    pub const MANIFEST: &'static str = "get_from_manifest";
    pub const DEPLOYMENT: &'static str = "get_from_deployment";

    pub fn new(name: &'static str, document: Document) -> Self {
        Self {
            name,
            document: Arc::new(document),
        }
    }
}

impl tera::Function for PathFunction {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let path = string_arg(self.name, args, "path")?;
        resolve(&self.document, path).map(Value::String).map_err(|failure| {
            CallError {
                function: self.name,
                failure: failure.into(),
            }
            .into_tera()
        })
    }
}

/// One entry of the function registry.
#[derive(Clone)]
pub enum Capability {
    Secret(SecretFunction),
    InstanceGroup(InstanceGroupFunction),
    Block(BlockFunction),
    Path(PathFunction),
}

impl Capability {
    /// Name the function is called by in templates.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Secret(_) => SecretFunction::NAME,
            Self::InstanceGroup(_) => InstanceGroupFunction::NAME,
            Self::Block(block) => block.name,
            Self::Path(path) => path.name,
        }
    }

    fn register(&self, tera: &mut Tera) {
        let name = self.name();
        match self {
            Self::Secret(f) => tera.register_function(name, f.clone()),
            Self::InstanceGroup(f) => tera.register_function(name, f.clone()),
            Self::Block(f) => tera.register_function(name, f.clone()),
            Self::Path(f) => tera.register_function(name, f.clone()),
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Capability").field(&self.name()).finish()
    }
}

/// The set of functions one template kind may call.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    capabilities: Vec<Capability>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `capability`, replacing any earlier one with the same name.
    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.retain(|existing| existing.name() != capability.name());
        self.capabilities.push(capability);
        self
    }

    /// Function names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.capabilities.iter().map(Capability::name)
    }

    /// Register every capability as a Tera function.
    pub fn register_into(&self, tera: &mut Tera) {
        for capability in &self.capabilities {
            capability.register(tera);
        }
    }
}
