//! Configuration snapshot
//!
//! [`MutableConfig`] is deserialized from a TOML or JSON file and may be
//! adjusted by the caller (command-line overrides). [`MutableConfig::freeze`]
//! is the single merge boundary: it resolves every tri-state policy and
//! produces the immutable [`Config`] that processing contexts share.
//!
//! ```toml
//! [fields]
//! project = "topmark"
//! license = "MIT"
//!
//! [header]
//! fields = ["file", "file_relpath", "project", "license"]
//! relative_to = "."
//! format = "native"
//!
//! [files]
//! exclude_file_types = ["markdown"]
//!
//! [policy]
//! add_only = true
//!
//! [policy_by_type.python]
//! allow_header_in_empty_files = true
//!
//! [writer]
//! mode = "atomic"
//! ```

mod policy;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use topmark_fs::{ConfigStore, NormalizedPath, WriteMode};

use crate::error::{Error, Result};

pub use policy::{MutablePolicy, Policy, PolicyRegistry};

/// Header fields rendered when the configuration names none.
pub const DEFAULT_HEADER_FIELDS: &[&str] = &["file", "file_relpath"];

/// How the header text is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderFormat {
    /// Comment syntax of the file's processor.
    #[default]
    Native,
    /// Bare `key: value` lines, for preview only.
    Plain,
}

/// `[header]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderSection {
    /// Ordered field names to render.
    pub fields: Option<Vec<String>>,
    /// Root for relative path fields.
    pub relative_to: Option<PathBuf>,
    pub format: Option<HeaderFormat>,
}

/// `[files]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesSection {
    pub include_file_types: Vec<String>,
    pub exclude_file_types: Vec<String>,
}

/// `[writer]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterSection {
    pub mode: Option<WriteMode>,
}

/// Editable configuration, before freezing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MutableConfig {
    /// Explicit field values; these override built-in fields of the same name.
    pub fields: BTreeMap<String, String>,
    pub header: HeaderSection,
    pub files: FilesSection,
    pub policy: MutablePolicy,
    pub policy_by_type: BTreeMap<String, MutablePolicy>,
    pub writer: WriterSection,
    /// Persist planned changes. Never read from files.
    #[serde(skip)]
    pub apply_changes: bool,
}

impl MutableConfig {
    /// Load a configuration file (TOML or JSON, by extension).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let config = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path, "Loaded configuration");
        Ok(config)
    }

    /// Resolve into an immutable [`Config`].
    ///
    /// Per-type policies inherit unset switches from the resolved global
    /// policy. `add_only` together with `update_only` is rejected at
    /// either level.
    pub fn freeze(self) -> Result<Config> {
        let global = self.policy.resolve(&Policy::default());
        check_policy("global policy", &global)?;

        let mut by_type = BTreeMap::new();
        for (name, overlay) in &self.policy_by_type {
            let resolved = overlay.resolve(&global);
            check_policy(&format!("file type {name}"), &resolved)?;
            by_type.insert(name.clone(), resolved);
        }

        let header_fields = match self.header.fields {
            Some(fields) => fields,
            None => DEFAULT_HEADER_FIELDS.iter().map(|f| f.to_string()).collect(),
        };
        for name in header_fields.iter().chain(self.fields.keys()) {
            if !is_valid_field_name(name) {
                return Err(Error::InvalidFieldName { name: name.clone() });
            }
        }

        let relative_to = self
            .header
            .relative_to
            .map(NormalizedPath::new)
            .unwrap_or_else(|| NormalizedPath::new("."))
            .absolutize();

        Ok(Config {
            field_values: self.fields,
            header_fields,
            relative_to,
            header_format: self.header.format.unwrap_or_default(),
            include_file_types: self.files.include_file_types.into_iter().collect(),
            exclude_file_types: self.files.exclude_file_types.into_iter().collect(),
            policies: PolicyRegistry::new(global, by_type),
            apply_changes: self.apply_changes,
            write_mode: self.writer.mode.unwrap_or_default(),
        })
    }
}

fn check_policy(scope: &str, policy: &Policy) -> Result<()> {
    if policy.add_only && policy.update_only {
        return Err(Error::PolicyConflict {
            scope: scope.to_string(),
        });
    }
    Ok(())
}

fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Immutable configuration shared by every processing context.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub field_values: BTreeMap<String, String>,
    /// Ordered names of the fields to render.
    pub header_fields: Vec<String>,
    /// Absolute root for relative path fields.
    pub relative_to: NormalizedPath,
    pub header_format: HeaderFormat,
    /// When non-empty, only these file types are processed.
    pub include_file_types: BTreeSet<String>,
    pub exclude_file_types: BTreeSet<String>,
    pub policies: PolicyRegistry,
    pub apply_changes: bool,
    pub write_mode: WriteMode,
}

impl Config {
    /// Whether the include/exclude filters admit a file type.
    pub fn admits_file_type(&self, name: &str) -> bool {
        (self.include_file_types.is_empty() || self.include_file_types.contains(name))
            && !self.exclude_file_types.contains(name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_values: BTreeMap::new(),
            header_fields: DEFAULT_HEADER_FIELDS.iter().map(|f| f.to_string()).collect(),
            relative_to: NormalizedPath::new(".").absolutize(),
            header_format: HeaderFormat::Native,
            include_file_types: BTreeSet::new(),
            exclude_file_types: BTreeSet::new(),
            policies: PolicyRegistry::default(),
            apply_changes: false,
            write_mode: WriteMode::Atomic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_global_policy_is_rejected() {
        let config = MutableConfig {
            policy: MutablePolicy {
                add_only: Some(true),
                update_only: Some(true),
                ..MutablePolicy::default()
            },
            ..MutableConfig::default()
        };
        assert!(matches!(config.freeze(), Err(Error::PolicyConflict { .. })));
    }

    #[test]
    fn test_conflict_through_inheritance_is_rejected() {
        let mut config = MutableConfig {
            policy: MutablePolicy {
                add_only: Some(true),
                ..MutablePolicy::default()
            },
            ..MutableConfig::default()
        };
        config.policy_by_type.insert(
            "python".into(),
            MutablePolicy {
                update_only: Some(true),
                ..MutablePolicy::default()
            },
        );
        let err = config.freeze().unwrap_err();
        assert!(err.to_string().contains("python"));
    }

    #[test]
    fn test_per_type_policy_inherits_global() {
        let mut config = MutableConfig {
            policy: MutablePolicy {
                allow_reflow: Some(true),
                ..MutablePolicy::default()
            },
            ..MutableConfig::default()
        };
        config.policy_by_type.insert(
            "xml".into(),
            MutablePolicy {
                allow_header_in_empty_files: Some(true),
                ..MutablePolicy::default()
            },
        );
        let frozen = config.freeze().unwrap();
        let xml = frozen.policies.for_type(Some("xml"));
        assert!(xml.allow_reflow);
        assert!(xml.allow_header_in_empty_files);
        assert!(!frozen.policies.global().allow_header_in_empty_files);
    }

    #[test]
    fn test_default_fields_when_unset() {
        let frozen = MutableConfig::default().freeze().unwrap();
        assert_eq!(frozen.header_fields, vec!["file", "file_relpath"]);
        assert!(frozen.relative_to.is_absolute());
    }

    #[test]
    fn test_invalid_field_name_is_rejected() {
        let config = MutableConfig {
            header: HeaderSection {
                fields: Some(vec!["bad name".into()]),
                ..HeaderSection::default()
            },
            ..MutableConfig::default()
        };
        assert!(matches!(config.freeze(), Err(Error::InvalidFieldName { .. })));
    }

    #[test]
    fn test_file_type_filters() {
        let mut config = Config::default();
        config.exclude_file_types.insert("markdown".into());
        assert!(config.admits_file_type("python"));
        assert!(!config.admits_file_type("markdown"));
        config.include_file_types.insert("python".into());
        assert!(!config.admits_file_type("rust"));
    }
}
