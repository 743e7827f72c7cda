//! Manifest assembly helpers.
//!
//! Pure functions turning broker inputs into BOSH manifest sections, plus the YAML
//! fragment formatting the block functions emit. Fragments always start at column 0;
//! the template decides where they are embedded.

use serde::Serialize;

use crate::constants::{
    DEFAULT_CANARIES, DEFAULT_MAX_IN_FLIGHT, DEFAULT_WATCH_TIME, STEMCELL_ALIAS_PREFIX,
};
use crate::models::{
    InstanceGroup, ManifestInstanceGroup, ManifestNetwork, ManifestRelease, ManifestStemcell,
    ManifestUpdate, MaxInFlight, ServiceRelease, Stemcell, UpdatePolicy,
};

/// Alias of the stemcell declared at `index`.
#[must_use]
pub fn stemcell_alias(index: usize) -> String {
    format!("{STEMCELL_ALIAS_PREFIX}{index}")
}

#[must_use]
pub fn releases(releases: &[ServiceRelease]) -> Vec<ManifestRelease> {
    releases
        .iter()
        .map(|release| ManifestRelease {
            name: release.name.clone(),
            version: release.version.clone(),
        })
        .collect()
}

/// Stemcells aliased `stemcell_0`, `stemcell_1`, ... in declaration order.
#[must_use]
pub fn stemcells(stemcells: &[Stemcell]) -> Vec<ManifestStemcell> {
    stemcells
        .iter()
        .enumerate()
        .map(|(index, stemcell)| ManifestStemcell {
            alias: stemcell_alias(index),
            os: stemcell.os.clone(),
            version: stemcell.version.clone(),
        })
        .collect()
}

/// The plan's update policy verbatim, or the default policy when the plan has none.
#[must_use]
pub fn update(policy: Option<&UpdatePolicy>) -> ManifestUpdate {
    match policy {
        Some(policy) => ManifestUpdate {
            canaries: policy.canaries,
            max_in_flight: policy.max_in_flight.clone(),
            canary_watch_time: policy.canary_watch_time.clone(),
            update_watch_time: policy.update_watch_time.clone(),
            serial: policy.serial,
        },
        None => ManifestUpdate {
            canaries: DEFAULT_CANARIES,
            max_in_flight: MaxInFlight::Count(DEFAULT_MAX_IN_FLIGHT),
            canary_watch_time: DEFAULT_WATCH_TIME.to_string(),
            update_watch_time: DEFAULT_WATCH_TIME.to_string(),
            serial: None,
        },
    }
}

#[must_use]
pub fn networks(names: &[String]) -> Vec<ManifestNetwork> {
    names
        .iter()
        .map(|name| ManifestNetwork {
            name: name.clone(),
        })
        .collect()
}

/// Manifest instance group for a plan instance group, running on `stemcell`.
#[must_use]
pub fn instance_group(group: &InstanceGroup, stemcell: &str) -> ManifestInstanceGroup {
    ManifestInstanceGroup {
        name: group.name.clone(),
        instances: group.instances,
        vm_type: group.vm_type.clone(),
        vm_extensions: group.vm_extensions.clone(),
        persistent_disk_type: group.persistent_disk_type.clone(),
        stemcell: stemcell.to_string(),
        networks: networks(&group.networks),
        azs: group.azs.clone(),
        lifecycle: group.lifecycle.clone(),
    }
}

/// Serialize `value` as a top-level YAML fragment.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

/// `name:` followed by `value` as YAML, with `prefix` before every body line.
///
/// Empty sequences are written inline (`name: []`) so the fragment stays valid YAML at
/// any prefix.
pub fn named_block<T: Serialize + ?Sized>(
    name: &str,
    value: &T,
    prefix: &str,
) -> Result<String, serde_yaml::Error> {
    let body = to_yaml(value)?;
    if body.trim() == "[]" {
        return Ok(format!("{name}: []\n"));
    }
    Ok(format!("{name}:\n{}", indent(&body, prefix)))
}

/// Prefix every non-empty line of `text` with `prefix`.
#[must_use]
pub fn indent(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_string();
    }
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim_end_matches(['\r', '\n']).is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}
