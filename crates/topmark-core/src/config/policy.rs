//! Header policies
//!
//! [`MutablePolicy`] is the tri-state layer read from configuration;
//! [`Policy`] is the resolved form the pipeline consults. The two meet
//! only in [`MutablePolicy::resolve`], called while freezing a config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resolved policy switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// Only insert headers into files that have none.
    pub add_only: bool,
    /// Only update existing headers; never insert.
    pub update_only: bool,
    /// Allow inserting a header into a zero-byte file.
    pub allow_header_in_empty_files: bool,
    /// Render a markers-only header when no fields are configured.
    pub render_empty_header_when_no_fields: bool,
    /// Allow splitting an existing line to place the header.
    pub allow_reflow: bool,
    /// Allow content probes during file-type resolution.
    pub allow_content_probe: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            add_only: false,
            update_only: false,
            allow_header_in_empty_files: false,
            render_empty_header_when_no_fields: false,
            allow_reflow: false,
            allow_content_probe: true,
        }
    }
}

/// Policy with every switch optional. Unset switches inherit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MutablePolicy {
    pub add_only: Option<bool>,
    pub update_only: Option<bool>,
    pub allow_header_in_empty_files: Option<bool>,
    pub render_empty_header_when_no_fields: Option<bool>,
    pub allow_reflow: Option<bool>,
    pub allow_content_probe: Option<bool>,
}

impl MutablePolicy {
    /// Fill unset switches from `base`.
    pub fn resolve(&self, base: &Policy) -> Policy {
        Policy {
            add_only: self.add_only.unwrap_or(base.add_only),
            update_only: self.update_only.unwrap_or(base.update_only),
            allow_header_in_empty_files: self
                .allow_header_in_empty_files
                .unwrap_or(base.allow_header_in_empty_files),
            render_empty_header_when_no_fields: self
                .render_empty_header_when_no_fields
                .unwrap_or(base.render_empty_header_when_no_fields),
            allow_reflow: self.allow_reflow.unwrap_or(base.allow_reflow),
            allow_content_probe: self.allow_content_probe.unwrap_or(base.allow_content_probe),
        }
    }

    /// Overlay the switches set in `other` onto `self`.
    pub fn merge(&mut self, other: &MutablePolicy) {
        fn pick(target: &mut Option<bool>, value: Option<bool>) {
            if value.is_some() {
                *target = value;
            }
        }
        pick(&mut self.add_only, other.add_only);
        pick(&mut self.update_only, other.update_only);
        pick(
            &mut self.allow_header_in_empty_files,
            other.allow_header_in_empty_files,
        );
        pick(
            &mut self.render_empty_header_when_no_fields,
            other.render_empty_header_when_no_fields,
        );
        pick(&mut self.allow_reflow, other.allow_reflow);
        pick(&mut self.allow_content_probe, other.allow_content_probe);
    }
}

/// Frozen global and per-file-type policies.
///
/// Lookups are pure selection; all inheritance happened at freeze time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyRegistry {
    global: Policy,
    by_type: BTreeMap<String, Policy>,
}

impl PolicyRegistry {
    pub(crate) fn new(global: Policy, by_type: BTreeMap<String, Policy>) -> Self {
        Self { global, by_type }
    }

    pub fn global(&self) -> &Policy {
        &self.global
    }

    /// The effective policy for a file type, falling back to the global one.
    pub fn for_type(&self, file_type: Option<&str>) -> &Policy {
        file_type
            .and_then(|name| self.by_type.get(name))
            .unwrap_or(&self.global)
    }
}
