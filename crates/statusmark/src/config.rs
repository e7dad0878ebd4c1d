// ABOUTME: User configuration for the statusmark binary, read from statusmark.toml
// ABOUTME: Every section is optional and invalid values fall back to defaults with a warning

use serde::{Deserialize, Serialize};
use statusmark_core::normalize_hex_color;
use statusmark_core::parse_hex_color;
use statusmark_logging::{LoggingConfig, StderrFormat, warn};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "statusmark.toml";

const DEFAULT_SETTINGS_FILE: &str = ".vscode/settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Workspace settings file, relative to the workspace folder
    #[serde(default = "default_settings_file")]
    pub settings_file: PathBuf,

    #[serde(default)]
    pub indicator: IndicatorConfig,

    #[serde(default)]
    pub logging: LogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Badge text color used when no badge color is set
    #[serde(default)]
    pub default_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// Level directives, e.g. `debug` or `info,statusmark_core=trace`
    #[serde(default)]
    pub level: Option<String>,

    /// Prompts own the terminal, so stderr logging is opt-in
    #[serde(default)]
    pub stderr: StderrFormat,

    #[serde(default = "default_true")]
    pub file: bool,

    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: None,
            stderr: StderrFormat::Off,
            file: true,
            file_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_file: default_settings_file(),
            indicator: IndicatorConfig::default(),
            logging: LogSection::default(),
        }
    }
}

fn default_settings_file() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_FILE)
}

fn default_true() -> bool {
    true
}

/// `~/.config/statusmark` or the platform equivalent
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("statusmark")
}

impl AppConfig {
    /// Load configuration from the standard location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from_dir(&config_dir())
    }

    /// Load configuration from a specific directory; a missing file yields defaults.
    ///
    /// Values are not validated here since logging is configured from the result;
    /// call [`AppConfig::sanitized`] once the subscriber is up.
    pub fn load_from_dir(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&text)?;
        Ok(config)
    }

    /// Replace invalid values with defaults
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        if config.settings_file.as_os_str().is_empty() {
            warn!("Empty settings_file, using {DEFAULT_SETTINGS_FILE}");
            config.settings_file = default_settings_file();
        }

        if let Some(color) = config.indicator.default_color.take() {
            if parse_hex_color(&color).is_some() {
                config.indicator.default_color = Some(normalize_hex_color(&color));
            } else {
                warn!(color = %color, "Invalid indicator default_color, ignoring it");
            }
        }

        if let Some(level) = config.logging.level.take() {
            match LoggingConfig::default().apply_directives(&level) {
                Ok(()) => config.logging.level = Some(level),
                Err(e) => warn!(level = %level, error = %e, "Invalid log level, ignoring it"),
            }
        }

        config
    }

    /// Fold the logging section into a logging configuration
    pub fn apply_logging(&self, logging: &mut LoggingConfig) {
        // Invalid directives are skipped here and reported by `sanitized`
        if let Some(level) = self.logging.level.as_deref() {
            let mut candidate = logging.clone();
            if candidate.apply_directives(level).is_ok() {
                *logging = candidate;
            }
        }
        logging.stderr = self.logging.stderr;
        logging.file = match (&self.logging.file_path, self.logging.file) {
            (_, false) => None,
            (Some(path), true) => Some(path.clone()),
            (None, true) => logging.file.take(),
        };
    }
}
