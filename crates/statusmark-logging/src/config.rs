// ABOUTME: Logging configuration: level directives, stderr format and the log file
// ABOUTME: Environment variables override whatever the application config file chose

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Level directives, e.g. `debug` or `info,statusmark_core=trace`
pub const LEVEL_ENV: &str = "STATUSMARK_LOG";
/// `off`, `compact`, `pretty` or `json`
pub const STDERR_ENV: &str = "STATUSMARK_LOG_STDERR";
/// Log file path, or `off`
pub const FILE_ENV: &str = "STATUSMARK_LOG_FILE";

/// Serde-friendly wrapper around [`tracing::Level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub Level);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(Level::INFO)
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Lowercase so it doubles as an EnvFilter directive
        f.write_str(&self.0.as_str().to_ascii_lowercase())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_log_level(&raw)
            .map(LogLevel)
            .map_err(serde::de::Error::custom)
    }
}

/// How log records are written to stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StderrFormat {
    /// Terminal prompts draw on stderr, so nothing by default
    #[default]
    Off,
    Compact,
    Pretty,
    Json,
}

impl FromStr for StderrFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("Unknown stderr log format '{other}' (off, compact, pretty, json)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for every target without its own entry
    pub level: LogLevel,

    /// Per-target levels, keyed by crate or module path
    pub targets: BTreeMap<String, LogLevel>,

    pub stderr: StderrFormat,

    /// Daily-rotated log file; `None` disables file logging
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            targets: BTreeMap::new(),
            stderr: StderrFormat::default(),
            file: Some(default_log_file()),
        }
    }
}

impl LoggingConfig {
    /// Apply `STATUSMARK_LOG` (falling back to `RUST_LOG`), `STATUSMARK_LOG_STDERR`
    /// and `STATUSMARK_LOG_FILE` from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(directives) = var(LEVEL_ENV).or_else(|| var("RUST_LOG")) {
            self.apply_directives(&directives)
                .with_context(|| format!("Invalid log level directives '{directives}'"))?;
        }

        if let Some(format) = var(STDERR_ENV) {
            self.stderr = format.parse()?;
        }

        if let Some(file) = var(FILE_ENV) {
            self.file = match file.trim() {
                "" | "off" => None,
                path => Some(PathBuf::from(path)),
            };
        }

        Ok(())
    }

    /// Merge comma-separated `level` / `target=level` directives
    pub fn apply_directives(&mut self, directives: &str) -> Result<()> {
        for directive in directives.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }
            match directive.split_once('=') {
                Some((target, level)) => {
                    self.targets
                        .insert(target.trim().to_string(), parse_log_level(level)?.into());
                }
                None => self.level = parse_log_level(directive)?.into(),
            }
        }
        Ok(())
    }

    /// The configuration as an `EnvFilter` directive string
    pub fn filter_directives(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// `statusmark.log` under the platform config directory
pub fn default_log_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("statusmark"))
        .unwrap_or_default()
        .join("statusmark.log")
}

/// Parse a level name, ignoring case; `warning` is accepted for `warn`
pub fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => bail!("Invalid log level '{raw}' (trace, debug, info, warn, error)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_keep_stderr_free() {
        let config = LoggingConfig::default();

        assert_eq!(config.level, LogLevel(Level::INFO));
        assert_eq!(config.stderr, StderrFormat::Off);
        assert!(config.file.unwrap().ends_with("statusmark.log"));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level(" warning ").unwrap(), Level::WARN);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_directives_set_global_and_target_levels() {
        let mut config = LoggingConfig::default();

        config
            .apply_directives("warn, statusmark_core=trace,statusmark=debug")
            .unwrap();

        assert_eq!(config.level, LogLevel(Level::WARN));
        assert_eq!(
            config.filter_directives(),
            "warn,statusmark=debug,statusmark_core=trace"
        );
    }

    #[test]
    fn test_statusmark_log_wins_over_rust_log() {
        let mut config = LoggingConfig::default();

        config
            .apply_overrides(vars(&[("STATUSMARK_LOG", "error"), ("RUST_LOG", "trace")]))
            .unwrap();

        assert_eq!(config.level, LogLevel(Level::ERROR));
    }

    #[test]
    fn test_stderr_and_file_overrides() {
        let mut config = LoggingConfig::default();

        config
            .apply_overrides(vars(&[
                ("STATUSMARK_LOG_STDERR", "json"),
                ("STATUSMARK_LOG_FILE", "off"),
            ]))
            .unwrap();

        assert_eq!(config.stderr, StderrFormat::Json);
        assert_eq!(config.file, None);

        config
            .apply_overrides(vars(&[("STATUSMARK_LOG_FILE", "/tmp/sm.log")]))
            .unwrap();
        assert_eq!(config.file, Some(PathBuf::from("/tmp/sm.log")));
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let mut config = LoggingConfig::default();

        assert!(config
            .apply_overrides(vars(&[("STATUSMARK_LOG", "statusmark=loud")]))
            .is_err());
        assert!(config
            .apply_overrides(vars(&[("STATUSMARK_LOG_STDERR", "rainbow")]))
            .is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LoggingConfig = toml::from_str(
            r#"
level = "debug"
stderr = "pretty"

[targets]
statusmark_core = "trace"
"#,
        )
        .unwrap();

        assert_eq!(config.level, LogLevel(Level::DEBUG));
        assert_eq!(config.stderr, StderrFormat::Pretty);
        assert_eq!(config.targets["statusmark_core"], LogLevel(Level::TRACE));
        assert!(config.file.is_some());
    }
}
