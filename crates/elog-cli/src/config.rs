//! Configuration loading and management.

use std::path::{Path, PathBuf};

use elog_core::{RawNumber, RawOptions, RawStatus};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Supplies start-of-day conditions for log documents that leave them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Status code in effect when the day begins (1-4).
    pub start_status: u8,
    /// Consecutive off-duty hours carried over from the prior day.
    pub start_off_duty_hours: f64,
    /// Driving hours carried over from the prior day.
    pub start_driving_hours: f64,
    /// On-duty window hours carried over from the prior day.
    pub start_duty_hours: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_status: 1,
            start_off_duty_hours: 0.0,
            start_driving_hours: 0.0,
            start_duty_hours: 0.0,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (ELOG_*)
        figment = figment.merge(Env::prefixed("ELOG_"));

        figment.extract()
    }

    /// Fills options the log document left out.
    pub fn fill_options(&self, options: &mut RawOptions) {
        options
            .start_status
            .get_or_insert(RawStatus::Number(f64::from(self.start_status)));
        options
            .start_off_duty_hours
            .get_or_insert(RawNumber::Number(self.start_off_duty_hours));
        options
            .start_driving_hours
            .get_or_insert(RawNumber::Number(self.start_driving_hours));
        options
            .start_duty_hours
            .get_or_insert(RawNumber::Number(self.start_duty_hours));
    }
}

/// Returns the platform-specific config directory for elog.
///
/// On Linux: `~/.config/elog`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("elog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use elog_core::{ComplianceConfig, DutyStatus};

    #[test]
    fn test_dirs_config_path_ends_with_elog() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "elog");
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("elog.toml");
        std::fs::write(&path, "start_status = 2\nstart_driving_hours = 3.5\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.start_status, 2);
        assert!((config.start_driving_hours - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fill_options_keeps_document_values() {
        let config = Config {
            start_status: 4,
            start_driving_hours: 2.0,
            ..Config::default()
        };
        let mut options = RawOptions {
            start_status: Some(RawStatus::Number(2.0)),
            ..RawOptions::default()
        };
        config.fill_options(&mut options);

        let resolved = ComplianceConfig::from_options(&options);
        assert_eq!(resolved.start_status, DutyStatus::SleeperBerth);
        assert!((resolved.start_driving_hours - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_start_status_defaults_to_off_duty() {
        let config = Config {
            start_status: 9,
            ..Config::default()
        };
        let mut options = RawOptions::default();
        config.fill_options(&mut options);

        let resolved = ComplianceConfig::from_options(&options);
        assert_eq!(resolved.start_status, DutyStatus::OffDuty);
    }
}
