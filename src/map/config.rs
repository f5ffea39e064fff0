use serde::{Deserialize, Serialize};
use std::path::Path;

use super::expand::DEFAULT_SEPARATOR;
use crate::errors::{ConfigError, SettingNotFoundError, find_closest_setting};

/// How dotted parameter names are expanded into nested maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionSettings {
    /// Character separating nesting levels (must be exactly one character)
    pub separator: String,
    /// Also keep the unsplit remainder of a name at every intermediate level
    pub keep_partial_keys: bool,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            keep_partial_keys: false,
        }
    }
}

impl ExpansionSettings {
    /// The separator as a character.
    ///
    /// Falls back to `.` when unset; loaded settings are validated so this
    /// only matters for hand-built values.
    pub fn separator(&self) -> char {
        self.separator.chars().next().unwrap_or(DEFAULT_SEPARATOR)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.chars().count() != 1 {
            return Err(ConfigError::InvalidSeparator(self.separator.clone()));
        }
        Ok(())
    }
}

/// How the CLI renders a parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Print the expansion collision report to stderr
    pub report_collisions: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            report_collisions: false,
        }
    }
}

/// Settings loaded from TOML files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub expansion: ExpansionSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Every settings key addressable with `config show`.
pub const SETTING_KEYS: &[&str] = &[
    "expansion.separator",
    "expansion.keep_partial_keys",
    "output.pretty",
    "output.report_collisions",
];

/// One override file: only the keys it names are applied.
#[derive(Debug, Default, Deserialize)]
struct SettingsLayer {
    #[serde(default)]
    expansion: ExpansionLayer,
    #[serde(default)]
    output: OutputLayer,
}

#[derive(Debug, Default, Deserialize)]
struct ExpansionLayer {
    separator: Option<String>,
    keep_partial_keys: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputLayer {
    pretty: Option<bool>,
    report_collisions: Option<bool>,
}

impl Settings {
    /// Parses settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.expansion.validate()?;
        Ok(settings)
    }

    /// Loads the built-in settings.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_toml(include_str!("../../settings.toml"))
    }

    /// Loads settings from a custom file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::from_toml(&content)
    }

    /// Loads settings with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in settings (from library)
    /// 2. `~/.config/nested-params/config.toml` (user overrides)
    /// 3. `./nested-params.toml` (project-local overrides)
    ///
    /// Later files override earlier ones key by key, so an override only
    /// needs to name what it changes.
    pub fn load_with_overrides() -> Result<Self, ConfigError> {
        let mut settings = Self::load_default()?;

        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("nested-params").join("config.toml"));
        }
        candidates.push(Path::new("nested-params.toml").to_path_buf());

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match settings.with_override(&path) {
                Ok(merged) => settings = merged,
                Err(e) => {
                    eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                }
            }
        }

        Ok(settings)
    }

    /// These settings with the override file at `path` applied, if the
    /// result is still valid.
    fn with_override(&self, path: &Path) -> Result<Self, ConfigError> {
        let layer: SettingsLayer = toml::from_str(&read_file(path)?)?;
        let mut merged = self.clone();
        merged.merge(layer);
        merged.expansion.validate()?;
        Ok(merged)
    }

    /// Applies the keys set in `layer` over these settings.
    fn merge(&mut self, layer: SettingsLayer) {
        if let Some(separator) = layer.expansion.separator {
            self.expansion.separator = separator;
        }
        if let Some(keep) = layer.expansion.keep_partial_keys {
            self.expansion.keep_partial_keys = keep;
        }
        if let Some(pretty) = layer.output.pretty {
            self.output.pretty = pretty;
        }
        if let Some(report) = layer.output.report_collisions {
            self.output.report_collisions = report;
        }
    }

    /// Renders one setting by its dotted key.
    pub fn get(&self, key: &str) -> Result<String, SettingNotFoundError> {
        let value = match key {
            "expansion.separator" => self.expansion.separator.clone(),
            "expansion.keep_partial_keys" => self.expansion.keep_partial_keys.to_string(),
            "output.pretty" => self.output.pretty.to_string(),
            "output.report_collisions" => self.output.report_collisions.to_string(),
            _ => {
                let suggestion = find_closest_setting(key, SETTING_KEYS);
                return Err(SettingNotFoundError::new(key, suggestion));
            }
        };
        Ok(value)
    }

    /// All settings as `(key, value)` pairs in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
