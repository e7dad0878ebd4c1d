// ABOUTME: Typed setting keys shared by the settings store and the core
// ABOUTME: Closed set of badge keys and status bar color override keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host setting that holds the color customization map
pub const COLOR_CUSTOMIZATIONS_SETTING: &str = "workbench.colorCustomizations";

/// Workspace-scoped badge settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKey {
    Name,
    Color,
    Emoji,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [SettingKey::Name, SettingKey::Color, SettingKey::Emoji];

    pub const fn as_str(self) -> &'static str {
        match self {
            SettingKey::Name => "statusmark.name",
            SettingKey::Color => "statusmark.color",
            SettingKey::Emoji => "statusmark.emoji",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two entries of the color customization map owned by StatusMark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarKey {
    Background,
    Foreground,
}

impl StatusBarKey {
    pub const ALL: [StatusBarKey; 2] = [StatusBarKey::Background, StatusBarKey::Foreground];

    pub const fn as_str(self) -> &'static str {
        match self {
            StatusBarKey::Background => "statusBar.background",
            StatusBarKey::Foreground => "statusBar.foreground",
        }
    }
}

impl fmt::Display for StatusBarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
