// ABOUTME: Persisted badge configuration for a workspace
// ABOUTME: Name, emoji and text color shown in the status indicator

use serde::{Deserialize, Serialize};

/// The label attached to a workspace.
///
/// Every field reads as an empty string when the setting is absent. A
/// non-empty `color` is always a `#RRGGBB` value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub emoji: String,
}

impl BadgeConfig {
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            emoji: emoji.into(),
        }
    }

    /// Text displayed by the indicator: emoji and name joined by a space
    pub fn display_text(&self) -> String {
        format!("{} {}", self.emoji, self.name).trim().to_string()
    }
}
