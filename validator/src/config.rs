//! Validator configuration.
//!
//! Values come from the environment (a `.env` file is loaded first when
//! present) and can be overridden with the builder methods.
//!
//! | Variable                 | Default  |
//! |--------------------------|----------|
//! | `CWR_ALLOWED_EXTENSIONS` | `V21`    |
//! | `CWR_ON_UNKNOWN_RECORD`  | `abort`  |
//! | `CWR_DUPLICATE_GROUPS`   | `report` |
//! | `CWR_MAX_REPORTED`       | `10`     |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

pub const ENV_ALLOWED_EXTENSIONS: &str = "CWR_ALLOWED_EXTENSIONS";
pub const ENV_ON_UNKNOWN_RECORD: &str = "CWR_ON_UNKNOWN_RECORD";
pub const ENV_DUPLICATE_GROUPS: &str = "CWR_DUPLICATE_GROUPS";
pub const ENV_MAX_REPORTED: &str = "CWR_MAX_REPORTED";

// =============================================================================
// Policies
// =============================================================================

/// What the flat scan does with a line whose type code is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRecordPolicy {
    /// Stop the scan and return the error.
    #[default]
    Abort,
    /// Put the line in the invalid partition and continue.
    Reject,
}

impl FromStr for UnknownRecordPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "reject" => Ok(Self::Reject),
            _ => Err(invalid(ENV_ON_UNKNOWN_RECORD, s)),
        }
    }
}

/// What the assembler does with a group whose transaction type was already
/// used by an earlier group.
///
/// Either way the group is left out of the document's group mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateGroupPolicy {
    /// Record a GROUP message and reject the document.
    #[default]
    Report,
    /// Drop the group without a message.
    Legacy,
}

impl FromStr for DuplicateGroupPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "report" => Ok(Self::Report),
            "legacy" => Ok(Self::Legacy),
            _ => Err(invalid(ENV_DUPLICATE_GROUPS, s)),
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// File extensions accepted by the file reader (case-insensitive).
    pub allowed_extensions: Vec<String>,
    pub on_unknown_record: UnknownRecordPolicy,
    pub duplicate_groups: DuplicateGroupPolicy,
    /// How many rejections the CLI prints in detail.
    pub max_reported: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["V21".to_string()],
            on_unknown_record: UnknownRecordPolicy::Abort,
            duplicate_groups: DuplicateGroupPolicy::Report,
            max_reported: 10,
        }
    }
}

impl ValidatorConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ALLOWED_EXTENSIONS) {
            config.allowed_extensions = value
                .split(',')
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(value) = lookup(ENV_ON_UNKNOWN_RECORD) {
            config.on_unknown_record = value.parse()?;
        }
        if let Some(value) = lookup(ENV_DUPLICATE_GROUPS) {
            config.duplicate_groups = value.parse()?;
        }
        if let Some(value) = lookup(ENV_MAX_REPORTED) {
            config.max_reported = value
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_MAX_REPORTED, &value))?;
        }

        Ok(config)
    }

    pub fn with_unknown_record_policy(mut self, policy: UnknownRecordPolicy) -> Self {
        self.on_unknown_record = policy;
        self
    }

    pub fn with_duplicate_group_policy(mut self, policy: DuplicateGroupPolicy) -> Self {
        self.duplicate_groups = policy;
        self
    }

    pub fn with_max_reported(mut self, max_reported: usize) -> Self {
        self.max_reported = max_reported;
        self
    }

    /// Whether `path` carries one of the allowed extensions.
    ///
    /// An empty allow-list accepts every file.
    pub fn allows_path(&self, path: &Path) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.allowed_extensions, vec!["V21"]);
        assert_eq!(config.on_unknown_record, UnknownRecordPolicy::Abort);
        assert_eq!(config.duplicate_groups, DuplicateGroupPolicy::Report);
    }

    #[test]
    fn test_overrides() {
        let config = ValidatorConfig::from_lookup(lookup(&[
            (ENV_ALLOWED_EXTENSIONS, "V21, .v22,"),
            (ENV_ON_UNKNOWN_RECORD, "Reject"),
            (ENV_DUPLICATE_GROUPS, "legacy"),
            (ENV_MAX_REPORTED, "3"),
        ]))
        .unwrap();
        assert_eq!(config.allowed_extensions, vec!["V21", "v22"]);
        assert_eq!(config.on_unknown_record, UnknownRecordPolicy::Reject);
        assert_eq!(config.duplicate_groups, DuplicateGroupPolicy::Legacy);
        assert_eq!(config.max_reported, 3);
    }

    #[test]
    fn test_invalid_values() {
        let err = ValidatorConfig::from_lookup(lookup(&[(ENV_ON_UNKNOWN_RECORD, "skip")])).unwrap_err();
        assert!(err.to_string().contains(ENV_ON_UNKNOWN_RECORD));

        let err = ValidatorConfig::from_lookup(lookup(&[(ENV_MAX_REPORTED, "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_MAX_REPORTED.into(),
                value: "many".into()
            }
        );
    }

    #[test]
    fn test_allows_path() {
        let config = ValidatorConfig::default();
        assert!(config.allows_path(Path::new("CW1328EMI_059.V21")));
        assert!(config.allows_path(Path::new("upload/cw1328emi_059.v21")));
        assert!(!config.allows_path(Path::new("CW1328EMI_059.txt")));
        assert!(!config.allows_path(Path::new("CW1328EMI_059")));

        let open = ValidatorConfig {
            allowed_extensions: vec![],
            ..ValidatorConfig::default()
        };
        assert!(open.allows_path(Path::new("anything")));
    }
}
