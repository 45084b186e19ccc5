//! Dashboard configuration.
//!
//! The critical-event watch-list and the status thresholds differ between
//! deployments, so they are read from YAML rather than compiled in:
//!
//! ```yaml
//! critical_event_ids: ["4625", "4771"]
//! status:
//!   critical_at: 50
//! top_k: 5
//! histogram_bins: 10
//! export_file_name: ssh_logs_filtered.csv
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above
//! (with `critical_event_ids` defaulting to `["4625"]`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::CriticalSet;
use crate::error::{Result, SshMonError};

/// Event ID flagged as critical when no configuration says otherwise
/// (failed logon).
pub const DEFAULT_CRITICAL_EVENT_ID: &str = "4625";

/// File name used for filtered exports.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "ssh_logs_filtered.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Event IDs counted as critical.
    pub critical_event_ids: Vec<String>,
    pub status: StatusThresholds,
    /// Number of entries in the top-offender ranking.
    pub top_k: usize,
    /// Number of bins in the attempts-per-IP histogram.
    pub histogram_bins: usize,
    pub export_file_name: String,
}

/// Thresholds applied to the critical-event count.
///
/// Zero critical events is always `normal`; a count below `critical_at`
/// is `elevated`; anything else is `critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusThresholds {
    pub critical_at: usize,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        StatusThresholds { critical_at: 50 }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            critical_event_ids: vec![DEFAULT_CRITICAL_EVENT_ID.to_string()],
            status: StatusThresholds::default(),
            top_k: 5,
            histogram_bins: 10,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration from YAML text and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document is a valid "all defaults" config.
        if yaml.trim().is_empty() {
            return Ok(DashboardConfig::default());
        }
        let config: DashboardConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(SshMonError::InvalidConfig(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(SshMonError::InvalidConfig(
                "export_file_name must not be empty".to_string(),
            ));
        }
        if let Some(id) = self.critical_event_ids.iter().find(|id| id.trim().is_empty()) {
            return Err(SshMonError::InvalidConfig(format!(
                "critical_event_ids contains a blank entry: {id:?}"
            )));
        }
        Ok(())
    }

    /// The configured watch-list as a lookup set.
    pub fn critical_set(&self) -> CriticalSet {
        CriticalSet::new(self.critical_event_ids.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.critical_event_ids, vec!["4625".to_string()]);
        assert_eq!(config.status.critical_at, 50);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.export_file_name, "ssh_logs_filtered.csv");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            DashboardConfig::from_yaml("  \n").unwrap(),
            DashboardConfig::default()
        );
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
critical_event_ids: ["4625", "4771"]
status:
  critical_at: 10
"#;
        let config = DashboardConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.critical_event_ids, vec!["4625", "4771"]);
        assert_eq!(config.status.critical_at, 10);
        assert_eq!(config.top_k, 5);
        assert!(config.critical_set().contains("4771"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = DashboardConfig::from_yaml("critical_ids: [\"1\"]").unwrap_err();
        assert!(matches!(err, SshMonError::ConfigYaml(_)), "got: {err}");
    }

    #[test]
    fn test_zero_bins_rejected() {
        let err = DashboardConfig::from_yaml("histogram_bins: 0").unwrap_err();
        assert!(
            matches!(err, SshMonError::InvalidConfig(ref s) if s.contains("histogram_bins")),
            "got: {err}"
        );
    }

    #[test]
    fn test_blank_critical_id_rejected() {
        let err = DashboardConfig::from_yaml("critical_event_ids: [\"4625\", \" \"]").unwrap_err();
        assert!(matches!(err, SshMonError::InvalidConfig(_)), "got: {err}");
    }
}
