//! Test utilities for the adapter
//!
//! Available to unit tests and, through the `test-utils` feature, to the integration
//! tests under `tests/`.
//!
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`fixtures`] holds a small Redis service: deployment, plan, templates and a deployed
//!   manifest
//! - [`write_hook_script`] drops an executable shell script into a directory
//!
//! # Example
//!
//! ```rust,no_run
//! use template_service_adapter::test_utils::{fixtures, init_test_logging};
//!
//! init_test_logging(None);
//! let params = fixtures::redis_generate_params();
//! assert_eq!(params.plan.name(), Some(fixtures::REDIS_PLAN_NAME));
//! ```

pub mod fixtures;

use std::path::Path;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used; otherwise
/// `RUST_LOG` is honoured, and without it nothing is logged.
///
/// ```bash
/// RUST_LOG=hooks=debug,templating=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Write an executable `/bin/sh` script named `name` into `dir` and return its path.
///
/// # Panics
///
/// If the file cannot be written or made executable.
#[cfg(unix)]
pub fn write_hook_script(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write hook script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make hook script executable");
    path.to_string_lossy().into_owned()
}
