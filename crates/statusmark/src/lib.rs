// ABOUTME: Terminal host for StatusMark backed by a JSON workspace settings file
// ABOUTME: Provides the CLI, user config, settings store, terminal prompts and status line

pub mod cli;
pub mod config;
pub mod file_watch;
pub mod host;
pub mod indicator;
pub mod settings_file;
pub mod terminal;

pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use host::TerminalHost;
pub use settings_file::{JsonSettingsFile, SettingsFileError};
