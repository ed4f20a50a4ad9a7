//! TOML configuration loader with validation.
//!
//! The plugin carries a small amount of deployment configuration: the
//! declared lengths of the host's panel/sound arrays and the fail-safe brake
//! notch used when a tick cannot produce a real output. Loaded once at
//! `Load` time from the path in `ATS_PLUGIN_CONFIG`, defaults apply when the
//! variable is unset.

use std::path::Path;

use ats_common::consts::{PANEL_LENGTH, SOUND_LENGTH};
use ats_common::wire::VehicleSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the TOML config file.
pub const CONFIG_ENV_VAR: &str = "ATS_PLUGIN_CONFIG";

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── PluginConfig ───────────────────────────────────────────────────

/// Deployment configuration for one plugin instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Declared length of the host panel array (int32 slots).
    pub panel_length: i32,
    /// Declared length of the host sound array (int32 slots).
    pub sound_length: i32,
    /// Brake notch commanded by the fail-safe output. `None` means full
    /// service brake for the current vehicle.
    pub fail_safe_brake: Option<i32>,
}

impl PluginConfig {
    /// Compile-time default configuration.
    pub const DEFAULT: Self = Self {
        panel_length: PANEL_LENGTH,
        sound_length: SOUND_LENGTH,
        fail_safe_brake: None,
    };

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Load from the path in [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::DEFAULT),
        }
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel_length <= 0 {
            return Err(ConfigError::Validation(format!(
                "panel_length must be positive, got {}",
                self.panel_length
            )));
        }
        if self.sound_length <= 0 {
            return Err(ConfigError::Validation(format!(
                "sound_length must be positive, got {}",
                self.sound_length
            )));
        }
        if let Some(notch) = self.fail_safe_brake
            && notch < 0
        {
            return Err(ConfigError::Validation(format!(
                "fail_safe_brake must be non-negative, got {notch}"
            )));
        }
        Ok(())
    }

    /// Resolve the fail-safe brake notch for a vehicle.
    #[inline]
    pub fn fail_safe_brake_for(&self, spec: &VehicleSpec) -> i32 {
        self.fail_safe_brake.unwrap_or(spec.brake_notches)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_host_contract() {
        let config = PluginConfig::default();
        assert_eq!(config.panel_length, 256);
        assert_eq!(config.sound_length, 256);
        assert_eq!(config.fail_safe_brake, None);
        config.validate().unwrap();
    }

    #[test]
    fn parses_full_document() {
        let config = PluginConfig::from_toml_str(
            "panel_length = 64\nsound_length = 32\nfail_safe_brake = 5\n",
        )
        .unwrap();
        assert_eq!(config.panel_length, 64);
        assert_eq!(config.sound_length, 32);
        assert_eq!(config.fail_safe_brake, Some(5));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = PluginConfig::from_toml_str("fail_safe_brake = 3\n").unwrap();
        assert_eq!(config.panel_length, 256);
        assert_eq!(config.fail_safe_brake, Some(3));
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let err = PluginConfig::from_toml_str("panel_length = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = PluginConfig::from_toml_str("sound_length = -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_negative_fail_safe_brake() {
        let err = PluginConfig::from_toml_str("fail_safe_brake = -2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = PluginConfig::from_toml_str("panell_length = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "panel_length = 128").unwrap();
        let config = PluginConfig::load(file.path()).unwrap();
        assert_eq!(config.panel_length, 128);
        assert_eq!(config.sound_length, 256);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PluginConfig::load(Path::new("/nonexistent/ats.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn fail_safe_brake_falls_back_to_full_service() {
        let spec = VehicleSpec {
            brake_notches: 8,
            ..VehicleSpec::default()
        };
        assert_eq!(PluginConfig::DEFAULT.fail_safe_brake_for(&spec), 8);

        let config = PluginConfig {
            fail_safe_brake: Some(6),
            ..PluginConfig::DEFAULT
        };
        assert_eq!(config.fail_safe_brake_for(&spec), 6);
    }
}
