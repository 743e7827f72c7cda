//! In-process hook runner backed by closures.

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use super::{HookError, HookRunner};
use crate::document::Document;

type HookFn = Box<dyn Fn(&Document) -> Result<Option<Document>, HookError> + Send + Sync>;

/// Hook runner that dispatches script names to registered closures.
///
/// Every call is recorded with the context it received, so render pipelines can be
/// checked for what their hooks saw. Running a name with no registered closure fails
/// the same way a missing executable does.
///
/// ```rust
/// use serde_json::json;
/// use template_service_adapter::hooks::{InMemoryHookRunner, invoke};
///
/// # #[tokio::main]
/// # async fn main() {
/// let runner = InMemoryHookRunner::new().with_hook("pre", |_| Ok(Some(json!({"port": 6379}))));
/// let output = invoke(&runner, "pre", &json!({})).await.unwrap();
/// assert_eq!(output, Some(json!({"port": 6379})));
/// assert_eq!(runner.invocations().len(), 1);
/// # }
/// ```
#[derive(Default)]
pub struct InMemoryHookRunner {
    hooks: HashMap<String, HookFn>,
    invocations: Mutex<Vec<(String, Document)>>,
}

impl InMemoryHookRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` under the script name `script`.
    #[must_use]
    pub fn with_hook<F>(mut self, script: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Document) -> Result<Option<Document>, HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(script.into(), Box::new(hook));
        self
    }

    /// Script names and contexts of every call so far, in call order.
    pub fn invocations(&self) -> Vec<(String, Document)> {
        self.invocations.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl std::fmt::Debug for InMemoryHookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("InMemoryHookRunner").field("hooks", &names).finish_non_exhaustive()
    }
}

impl HookRunner for InMemoryHookRunner {
    async fn run(&self, script: &str, context: &Document) -> Result<Option<Document>, HookError> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((script.to_string(), context.clone()));

        let hook = self.hooks.get(script).ok_or_else(|| HookError::Spawn {
            script: script.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no hook registered under this name"),
        })?;
        hook(context)
    }
}
