// ABOUTME: Identifiers of the commands a host can invoke
// ABOUTME: Each command maps to one workflow in statusmark-core

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandId {
    /// Name → emoji → badge color → status bar color
    Configure,
    /// Status bar color only
    ConfigureStatusBarColor,
    /// Clear badge settings and status bar overrides
    Reset,
}

impl CommandId {
    pub const ALL: [CommandId; 3] = [
        CommandId::Configure,
        CommandId::ConfigureStatusBarColor,
        CommandId::Reset,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CommandId::Configure => "statusmark.configure",
            CommandId::ConfigureStatusBarColor => "statusmark.configureStatusBarColor",
            CommandId::Reset => "statusmark.reset",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            CommandId::Configure => "StatusMark: Configure Badge",
            CommandId::ConfigureStatusBarColor => "StatusMark: Configure Status Bar Color",
            CommandId::Reset => "StatusMark: Reset",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown command: {0}")]
pub struct ParseCommandError(pub String);

impl FromStr for CommandId {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseCommandError(s.to_string()))
    }
}
