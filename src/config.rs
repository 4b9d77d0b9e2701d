//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mcd/mcd.toml`
//! 3. Environment variables: `MCD_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::output;

/// Errors while loading or rendering settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment overrides: {0}")]
    Environment(#[from] config::ConfigError),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// When to color terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Apply to the process-wide color switch of `colored` and to the
    /// stderr prefixes.
    pub fn apply(self) {
        match self {
            ColorMode::Auto => colored::control::unset_override(),
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
        }
        output::force_color(self == ColorMode::Always);
    }
}

impl FromStr for ColorMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(SettingsError::InvalidValue {
                key: "color".into(),
                value: s.into(),
            }),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        };
        f.write_str(s)
    }
}

/// Unified configuration for mcd.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Log filter used when no `-d` flag is given (e.g. "info", "mcd=debug")
    pub log_level: Option<String>,
    /// Terminal colors
    pub color: ColorMode,
}

/// Raw settings for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub log_level: Option<String>,
    pub color: Option<ColorMode>,
}

/// Get the XDG config directory for mcd.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mcd").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mcd.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Load settings with layered precedence from the standard locations.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(global_config_path().as_deref(), Self::env_source())
    }

    /// Load settings from an explicit global file (skipped when missing)
    /// and environment source.
    pub fn load_from(global: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(path) = global {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current, env)
    }

    /// `MCD_LOG_LEVEL`, `MCD_COLOR`, ...
    pub fn env_source() -> Environment {
        Environment::with_prefix("MCD")
            .prefix_separator("_")
            .separator("__")
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            log_level: overlay.log_level.clone().or_else(|| self.log_level.clone()),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Apply MCD_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder().add_source(env).build()?;

        if let Ok(val) = config.get_string("log_level") {
            settings.log_level = Some(val);
        }
        if let Ok(val) = config.get_string("color") {
            settings.color = val.parse()?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mcd configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mcd/mcd.toml
#   Env:    MCD_* environment variables (e.g. MCD_LOG_LEVEL, MCD_COLOR)

# Log filter used when no -d flag is given
# log_level = "info"

# Terminal colors: "auto", "always" or "never"
# color = "auto"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        Settings::env_source().source(Some(map))
    }

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, env(&[])).expect("load defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.color, ColorMode::Auto);
        assert!(settings.log_level.is_none());
    }

    #[test]
    fn given_env_overrides_when_loading_then_env_wins() {
        let settings = Settings::load_from(
            None,
            env(&[("MCD_LOG_LEVEL", "debug"), ("MCD_COLOR", "never")]),
        )
        .expect("load");
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.color, ColorMode::Never);
    }

    #[test]
    fn given_bad_color_in_env_when_loading_then_invalid_value() {
        let err = Settings::load_from(None, env(&[("MCD_COLOR", "sometimes")])).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn given_unrelated_env_when_loading_then_ignored() {
        let settings =
            Settings::load_from(None, env(&[("OTHER_COLOR", "never"), ("MCDX", "1")])).unwrap();
        assert_eq!(settings.color, ColorMode::Auto);
    }

    #[rstest]
    #[case("auto", ColorMode::Auto)]
    #[case("Always", ColorMode::Always)]
    #[case(" never ", ColorMode::Never)]
    fn test_color_mode_from_str(#[case] input: &str, #[case] expected: ColorMode) {
        assert_eq!(input.parse::<ColorMode>().unwrap(), expected);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings {
            log_level: Some("warn".into()),
            color: ColorMode::Always,
        };
        let overlay = RawSettings {
            log_level: None,
            color: Some(ColorMode::Never),
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert_eq!(merged.color, ColorMode::Never);
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips_color() {
        let settings = Settings {
            log_level: Some("info".into()),
            color: ColorMode::Never,
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("color = \"never\""));
        assert!(text.contains("log_level = \"info\""));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.log_level.is_none());
        assert!(raw.color.is_none());
    }
}
