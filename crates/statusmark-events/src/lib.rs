// ABOUTME: Cross-crate event and command definitions for decoupled communication
// ABOUTME: Settings change notifications and the externally invokable commands

pub mod command;
pub mod settings;

pub use command::{CommandId, ParseCommandError};
pub use settings::SettingsEvent;
