//! Constants shared across the adapter.
//!
//! Defaults that end up in rendered manifests live here so templates, tests and
//! documentation agree on them.

/// Plan property selecting the manifest template.
pub const PLAN_NAME_PROPERTY: &str = "name";

/// Prefix of synthesized stemcell aliases (`stemcell_0`, `stemcell_1`, ...).
pub const STEMCELL_ALIAS_PREFIX: &str = "stemcell_";

/// Canary count of the default update policy.
pub const DEFAULT_CANARIES: u32 = 1;

/// `max_in_flight` of the default update policy.
pub const DEFAULT_MAX_IN_FLIGHT: u64 = 1;

/// Canary and update watch window of the default update policy, in milliseconds.
pub const DEFAULT_WATCH_TIME: &str = "30000-240000";

/// Exit code telling the broker an adapter subcommand is not implemented.
pub const EXIT_NOT_IMPLEMENTED: i32 = 10;

/// Environment variable naming the adapter configuration file.
pub const CONFIG_ENV_VAR: &str = "TEMPLATE_ADAPTER_CONFIG";
