//! Tera-backed template execution with typed error recovery.

use std::error::Error as _;

use tera::Tera;

use super::context::RenderContext;
use super::functions::{CallError, CallFailure, FunctionRegistry};
use crate::core::AdapterError;

/// Renders template bodies against a [`RenderContext`] with a fixed function registry.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    registry: FunctionRegistry,
}

impl TemplateRenderer {
    #[must_use]
    pub const fn new(registry: FunctionRegistry) -> Self {
        Self {
            registry,
        }
    }

    /// Render `body`, naming it `template_name` in errors and logs.
    ///
    /// Output is not HTML-escaped. Rendering stops at the first failing function call and
    /// no partial output is returned.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::Path`] when a path accessor misses
    /// - [`AdapterError::TemplateFunction`] when any other template function fails
    /// - [`AdapterError::Template`] for syntax errors, undefined variables and the like
    pub fn render(
        &self,
        template_name: &str,
        body: &str,
        context: &RenderContext,
    ) -> Result<String, AdapterError> {
        tracing::debug!(
            target: "templating",
            "Rendering template '{}' with functions [{}]",
            template_name,
            self.registry.names().collect::<Vec<_>>().join(", ")
        );

        // Fresh instance per render; functions capture per-request state
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        self.registry.register_into(&mut tera);

        let rendered = tera
            .render_str(body, &context.to_tera())
            .map_err(|e| classify_tera_error(template_name, &e))?;

        tracing::debug!(target: "templating", "Template '{}' rendered", template_name);
        Ok(rendered)
    }
}

/// Map a Tera failure to the adapter error it stands for.
///
/// Errors raised by template functions are found in the source chain and returned
/// typed; everything else becomes [`AdapterError::Template`].
#[must_use]
pub fn classify_tera_error(template_name: &str, error: &tera::Error) -> AdapterError {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(call) = err.downcast_ref::<CallError>() {
            return match &call.failure {
                CallFailure::Path(path) => AdapterError::Path(path.clone()),
                CallFailure::Function(source) => AdapterError::TemplateFunction {
                    function: call.function.to_string(),
                    source: source.clone(),
                },
            };
        }
        current = err.source();
    }

    AdapterError::Template {
        template: template_name.to_string(),
        message: format_tera_error(error),
    }
}

/// Flatten a Tera error chain into one message without Tera's internal template names.
#[must_use]
pub fn format_tera_error(error: &tera::Error) -> String {
    let mut all_messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        all_messages.push(err.to_string());
        current = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|msg| {
            !msg.is_empty() && msg != "Template rendering failed" && msg != "Template syntax error"
        })
        .collect();

    if messages.is_empty() {
        "Template syntax error".to_string()
    } else {
        messages.join("\n  → ")
    }
}
