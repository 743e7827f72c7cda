//! Integration test suite for the template service adapter
//!
//! These tests drive the public API and the compiled binary end to end: templates
//! loaded from a config file, hook scripts run as real subprocesses, and output read
//! back the way the broker reads it.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **binding**: binding credentials rendered from a generated manifest
//! - **cli**: the `template-service-adapter` binary, its output and exit codes
//! - **hook_scripts**: pre/post hooks as executable scripts
//! - **manifest_generation**: manifest pipeline through the public API

mod binding;
mod cli;
#[cfg(unix)]
mod hook_scripts;
mod manifest_generation;
