//! External hook scripts run before and after each render.
//!
//! A hook is an executable that receives the JSON-serialized render context as its only
//! argument. On exit status 0 its standard output is either empty (no result) or a single
//! JSON value that the caller merges back into the context. Standard error is free-form
//! diagnostic text and is always logged, never parsed.
//!
//! Hooks are optional: an empty script path is a no-op handled by [`invoke`] before any
//! runner is consulted.
//!
//! # Runners
//!
//! - [`ScriptHookRunner`] spawns the script as a subprocess
//! - [`InMemoryHookRunner`] calls registered closures, for exercising render pipelines
//!   without real processes

mod memory;
mod script;

pub use memory::InMemoryHookRunner;
pub use script::ScriptHookRunner;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::document::Document;

/// Failure of a single hook invocation.
#[derive(Error, Debug)]
pub enum HookError {
    /// The script could not be started
    #[error("Failed to start hook '{script}': {source}")]
    Spawn {
        script: String,
        source: std::io::Error,
    },

    /// The script exited unsuccessfully
    #[error("Hook '{script}' exited with {}", exit_status_text(.code))]
    Execution {
        script: String,
        /// Exit code, or `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Standard output was neither empty nor valid JSON
    #[error("Hook '{script}' printed malformed JSON: {source}")]
    MalformedOutput {
        script: String,
        source: serde_json::Error,
    },

    /// The script ran past the configured timeout and was killed
    #[error("Hook '{script}' timed out after {timeout:?}")]
    TimedOut {
        script: String,
        timeout: Duration,
    },

    /// The render context could not be encoded as the script argument
    #[error("Failed to encode the context for hook '{script}': {source}")]
    ContextEncoding {
        script: String,
        source: serde_json::Error,
    },
}

fn exit_status_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "no exit status (terminated by signal)".to_string(), |c| format!("status {c}"))
}

/// Runs a hook script against a render context.
///
/// Implementations never see an empty script path; [`invoke`] short-circuits those.
pub trait HookRunner: Send + Sync {
    /// Run `script` with `context` and return its parsed output, `None` when it printed
    /// nothing.
    fn run(
        &self,
        script: &str,
        context: &Document,
    ) -> impl Future<Output = Result<Option<Document>, HookError>> + Send;
}

/// Invoke the hook at `script`, treating an empty path as "no hook configured".
pub async fn invoke<R: HookRunner>(
    runner: &R,
    script: &str,
    context: &Document,
) -> Result<Option<Document>, HookError> {
    if script.is_empty() {
        tracing::trace!(target: "hooks", "No hook configured, skipping");
        return Ok(None);
    }
    runner.run(script, context).await
}

/// Parse captured standard output. Whitespace-only output means "no result".
///
/// The raw bytes go straight to the JSON parser, so invalid UTF-8 is malformed output.
pub(crate) fn parse_output(script: &str, stdout: &[u8]) -> Result<Option<Document>, HookError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(stdout).map(Some).map_err(|source| HookError::MalformedOutput {
        script: script.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_script_is_never_run() {
        let runner = InMemoryHookRunner::new();
        let result = invoke(&runner, "", &json!({"plan": {}})).await.unwrap();
        assert!(result.is_none());
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_invoke_delegates_to_runner() {
        let runner = InMemoryHookRunner::new()
            .with_hook("pre", |_| Ok(Some(json!({"password": "s3cret"}))));
        let result = invoke(&runner, "pre", &json!({})).await.unwrap();
        assert_eq!(result, Some(json!({"password": "s3cret"})));
    }

    #[test]
    fn test_parse_output_blank_is_none() {
        assert!(parse_output("h", b"").unwrap().is_none());
        assert!(parse_output("h", b"  \n\t").unwrap().is_none());
    }

    #[test]
    fn test_parse_output_json_values() {
        assert_eq!(parse_output("h", b"{\"a\": 1}\n").unwrap(), Some(json!({"a": 1})));
        assert_eq!(parse_output("h", b"\"token\"").unwrap(), Some(json!("token")));
    }

    #[test]
    fn test_parse_output_malformed() {
        let err = parse_output("/hooks/pre.sh", b"not json").unwrap_err();
        assert!(matches!(err, HookError::MalformedOutput { ref script, .. } if script == "/hooks/pre.sh"));
    }

    #[test]
    fn test_parse_output_invalid_utf8_is_malformed() {
        let err = parse_output("h", b"{\"password\": \"\xff\xfe\"}").unwrap_err();
        assert!(matches!(err, HookError::MalformedOutput { .. }), "{err:?}");
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = HookError::TimedOut {
            script: "pre".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "Hook 'pre' timed out after 250ms");
    }

    #[test]
    fn test_execution_error_message() {
        let err = HookError::Execution {
            script: "post".to_string(),
            code: Some(2),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "Hook 'post' exited with status 2");
    }
}
