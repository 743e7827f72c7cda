//! Error types and user-facing error reporting.
//!
//! # Error Categories
//!
//! - **Document**: [`AdapterError::Conversion`], [`AdapterError::Path`]
//! - **Hooks**: [`AdapterError::Hook`]
//! - **Template selection**: [`AdapterError::MissingPlanName`], [`AdapterError::UnknownPlan`]
//! - **Template execution**: [`AdapterError::TemplateFunction`], [`AdapterError::Template`],
//!   [`AdapterError::YamlEncoding`]
//! - **Artifact parsing**: [`AdapterError::ManifestParse`], [`AdapterError::BindingParse`]
//! - **Plumbing**: [`AdapterError::Config`], [`AdapterError::NotImplemented`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use template_service_adapter::core::{AdapterError, user_friendly_error};
//!
//! let err = anyhow::Error::from(AdapterError::MissingPlanName);
//! let ctx = user_friendly_error(err);
//! ctx.display(); // colored error with a suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::constants::EXIT_NOT_IMPLEMENTED;
use crate::document::{ConversionError, PathError};
use crate::hooks::HookError;
use crate::templating::FunctionError;

/// The main error type for adapter operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// A native document could not be normalized
    #[error("Document conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// A path expression did not resolve
    #[error("Path lookup failed: {0}")]
    Path(#[from] PathError),

    /// A hook script failed or produced unusable output
    #[error("Hook failed: {0}")]
    Hook(#[from] HookError),

    /// A function called from a template failed, aborting the render
    #[error("Template function '{function}' failed: {source}")]
    TemplateFunction {
        function: String,
        source: FunctionError,
    },

    /// Tera rejected or failed to execute the template
    #[error("Template '{template}' failed to render: {message}")]
    Template {
        template: String,
        message: String,
    },

    /// The plan has no string `name` property
    #[error("Plan does not have a 'name' property")]
    MissingPlanName,

    /// No manifest template is registered for the plan
    #[error("Can't find plan template for name '{name}'")]
    UnknownPlan {
        name: String,
        /// Plans that do have a template
        available: Vec<String>,
    },

    /// The rendered manifest is not valid YAML
    #[error("Rendered manifest is not valid YAML: {source}")]
    ManifestParse {
        source: serde_yaml::Error,
    },

    /// The rendered binding is not valid binding JSON
    #[error("Rendered binding is not valid JSON: {source}")]
    BindingParse {
        source: serde_json::Error,
    },

    /// A manifest block or input document could not be encoded as YAML
    #[error("Failed to encode {what} as YAML: {source}")]
    YamlEncoding {
        what: String,
        source: serde_yaml::Error,
    },

    /// A value could not be stored in the render context
    #[error("Failed to store '{key}' in the render context: {source}")]
    ContextSerialization {
        key: String,
        source: serde_json::Error,
    },

    /// A write-once render context slot was written twice
    #[error("Render context slot '{key}' is already set")]
    ContextSlotOccupied {
        key: String,
    },

    /// The requested adapter operation is not offered
    #[error("Operation '{operation}' is not implemented by this adapter")]
    NotImplemented {
        operation: String,
    },

    /// Invalid adapter configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        message: String,
    },
}

impl AdapterError {
    /// Process exit code the broker expects for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotImplemented {
                ..
            } => EXIT_NOT_IMPLEMENTED,
            _ => 1,
        }
    }
}

/// Error wrapper with optional details and a suggestion for the operator.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: AdapterError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: AdapterError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with operator-facing hints.
///
/// Adapter errors get tailored suggestions. Other errors are reported with their full
/// `anyhow` context chain; TOML and missing-file causes anywhere in that chain add hints.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<AdapterError>() {
        Ok(adapter_error) => return create_error_context(adapter_error),
        Err(other) => other,
    };
    let message = format!("{error:#}");

    if error.chain().any(|cause| cause.is::<toml::de::Error>()) {
        return ErrorContext::new(AdapterError::Config {
            message,
        })
        .with_details("The adapter configuration file is not valid TOML or has unexpected fields")
        .with_suggestion(CONFIG_SUGGESTION);
    }

    let missing_file = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io_error| io_error.kind() == std::io::ErrorKind::NotFound);
    if missing_file {
        return ErrorContext::new(AdapterError::Other {
            message,
        })
        .with_suggestion(
            "Check that the file exists; template paths are relative to the configuration file",
        );
    }

    ErrorContext::new(AdapterError::Other {
        message,
    })
}

const CONFIG_SUGGESTION: &str = "Check the adapter configuration file passed with --config";

fn create_error_context(error: AdapterError) -> ErrorContext {
    match &error {
        AdapterError::MissingPlanName => {
            let ctx = ErrorContext::new(error)
                .with_details("The plan name selects which manifest template is rendered");
            ctx.with_suggestion(
                "Add a \"name\" entry to the plan's properties in the broker configuration",
            )
        }
        AdapterError::UnknownPlan {
            name,
            available,
        } => {
            let details = if available.is_empty() {
                "No manifest templates are configured".to_string()
            } else {
                format!("Configured plans: {}", available.join(", "))
            };
            let suggestion = match closest_plan(name, available) {
                Some(candidate) => format!("Did you mean '{candidate}'?"),
                None => format!(
                    "Register a template for '{name}' under [manifest_templates] in the adapter configuration"
                ),
            };
            ErrorContext::new(error).with_details(details).with_suggestion(suggestion)
        }
        AdapterError::ManifestParse {
            ..
        } => ErrorContext::new(error)
            .with_details("The rendered manifest text is logged before it is parsed")
            .with_suggestion(
                "Check the indentation around block functions; fragments are emitted starting at column 0",
            ),
        AdapterError::BindingParse {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "The binding template must render a JSON object with a \"credentials\" object",
        ),
        AdapterError::Hook(HookError::Execution {
            stderr,
            ..
        }) if !stderr.trim().is_empty() => {
            let details = format!("Hook stderr:\n{}", stderr.trim_end());
            ErrorContext::new(error).with_details(details)
        }
        AdapterError::Path(_) => ErrorContext::new(error).with_suggestion(
            "Compare the path with the manifest or deployment topology; run with --verbose to log the render context",
        ),
        AdapterError::TemplateFunction {
            source: FunctionError::InstanceGroupNotFound {
                ..
            },
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the instance group names declared by the plan"),
        AdapterError::NotImplemented {
            ..
        } => ErrorContext::new(error)
            .with_details("The broker treats this exit status as an unsupported operation"),
        AdapterError::Config {
            ..
        } => ErrorContext::new(error).with_suggestion(CONFIG_SUGGESTION),
        _ => ErrorContext::new(error),
    }
}

/// Closest configured plan name within half the name's length in edit distance.
fn closest_plan<'a>(name: &str, available: &'a [String]) -> Option<&'a str> {
    let threshold = name.len().div_ceil(2);
    available
        .iter()
        .map(|candidate| (candidate, strsim::levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.as_str())
}
