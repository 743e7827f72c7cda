//! Subprocess hook runner.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use super::{HookError, HookRunner, parse_output};
use crate::document::Document;

/// Runs hooks as external processes.
///
/// The context JSON is passed as the single argument. Standard output and standard
/// error are captured separately; stderr is logged at info level on target `hooks`
/// whether or not the script succeeded.
///
/// Without a timeout the runner waits for the script indefinitely. With one, an
/// overrunning script is killed and the invocation fails with [`HookError::TimedOut`].
#[derive(Debug, Clone, Default)]
pub struct ScriptHookRunner {
    timeout: Option<Duration>,
}

impl ScriptHookRunner {
    /// Runner that waits for scripts without a time limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
        }
    }

    /// Set the maximum run time of a single hook (`None` for no limit).
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout = duration;
        self
    }
}

impl HookRunner for ScriptHookRunner {
    async fn run(&self, script: &str, context: &Document) -> Result<Option<Document>, HookError> {
        let argument =
            serde_json::to_string(context).map_err(|source| HookError::ContextEncoding {
                script: script.to_string(),
                source,
            })?;

        tracing::debug!(target: "hooks", "Running hook: {}", script);

        let mut cmd = Command::new(script);
        cmd.arg(&argument)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output_future = cmd.output();
        let result = if let Some(duration) = self.timeout {
            if let Ok(result) = timeout(duration, output_future).await {
                result
            } else {
                tracing::warn!(target: "hooks", "Hook timed out after {:?}: {}", duration, script);
                return Err(HookError::TimedOut {
                    script: script.to_string(),
                    timeout: duration,
                });
            }
        } else {
            output_future.await
        };
        let output = result.map_err(|source| HookError::Spawn {
            script: script.to_string(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::info!(target: "hooks", "Hook {} stderr: {}", script, stderr.trim_end());

        if !output.status.success() {
            tracing::debug!(
                target: "hooks",
                "Hook failed with exit code: {:?}",
                output.status.code()
            );
            return Err(HookError::Execution {
                script: script.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        parse_output(script, &output.stdout)
    }
}
