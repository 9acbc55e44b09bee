//! Configuration file support for Lift Log.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::{Error, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub muscles: MuscleConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

/// Weight unit policy.
///
/// An explicit `lb`/`kg` suffix in the sets notation always wins; this unit
/// fills in when a weight carries no suffix, and is the unit metrics are
/// reported in.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UnitsConfig {
    #[serde(default)]
    pub default: WeightUnit,
}

/// Thresholds for the rule-based insights
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// RPE above this counts toward recovery warnings
    #[serde(default = "default_high_rpe_threshold")]
    pub high_rpe_threshold: f64,

    /// Consecutive high-RPE sessions that trigger a recovery warning
    #[serde(default = "default_consecutive_high_rpe_warning")]
    pub consecutive_high_rpe_warning: usize,

    /// Volume share (percent) above which a muscle group is flagged high
    #[serde(default = "default_high_volume_threshold")]
    pub high_volume_threshold: f64,

    /// Volume share (percent) below which a muscle group is flagged low
    #[serde(default = "default_low_volume_threshold")]
    pub low_volume_threshold: f64,

    /// Weeks without a session before an exercise counts as undertrained
    #[serde(default = "default_undertrained_weeks")]
    pub undertrained_weeks: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_rpe_threshold: default_high_rpe_threshold(),
            consecutive_high_rpe_warning: default_consecutive_high_rpe_warning(),
            high_volume_threshold: default_high_volume_threshold(),
            low_volume_threshold: default_low_volume_threshold(),
            undertrained_weeks: default_undertrained_weeks(),
        }
    }
}

/// Custom muscle-group rollups merged over the built-in grouping table
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MuscleConfig {
    #[serde(default)]
    pub extra_groupings: HashMap<String, String>,
}

// Default value functions
fn default_data_file() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("liftlog").join("workouts.csv")
}

fn default_high_rpe_threshold() -> f64 {
    8.5
}

fn default_consecutive_high_rpe_warning() -> usize {
    3
}

fn default_high_volume_threshold() -> f64 {
    40.0
}

fn default_low_volume_threshold() -> f64 {
    10.0
}

fn default_undertrained_weeks() -> i64 {
    4
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.units.default, WeightUnit::Pound);
        assert_eq!(config.analysis.high_rpe_threshold, 8.5);
        assert_eq!(config.analysis.consecutive_high_rpe_warning, 3);
        assert_eq!(config.analysis.undertrained_weeks, 4);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.units.default, config.units.default);
        assert_eq!(
            parsed.analysis.high_volume_threshold,
            config.analysis.high_volume_threshold
        );
        assert_eq!(parsed.data.data_file, config.data.data_file);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[units]
default = "kg"

[analysis]
undertrained_weeks = 6
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.units.default, WeightUnit::Kilogram);
        assert_eq!(config.analysis.undertrained_weeks, 6);
        assert_eq!(config.analysis.high_rpe_threshold, 8.5); // default
    }

    #[test]
    fn test_unit_aliases_parse() {
        let config: Config = toml::from_str("[units]\ndefault = \"lbs\"\n").unwrap();
        assert_eq!(config.units.default, WeightUnit::Pound);

        let config: Config = toml::from_str("[units]\ndefault = \"kilogram\"\n").unwrap();
        assert_eq!(config.units.default, WeightUnit::Kilogram);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.analysis.high_rpe_threshold = 9.0;
        config
            .muscles
            .extra_groupings
            .insert("Neck".into(), "Other".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.analysis.high_rpe_threshold, 9.0);
        assert_eq!(
            loaded.muscles.extra_groupings.get("Neck").map(String::as_str),
            Some("Other")
        );
    }
}
