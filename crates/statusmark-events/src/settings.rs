// ABOUTME: Notifications emitted by the settings store when values change
// ABOUTME: Lets the indicator refresh after edits made outside a workflow

use serde::{Deserialize, Serialize};
use statusmark_types::SettingKey;

/// Settings change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// The listed settings were written
    ConfigurationChanged { settings: Vec<String> },

    /// The whole settings source was reloaded; any value may have changed
    Reloaded,
}

impl SettingsEvent {
    pub fn changed(keys: impl IntoIterator<Item = SettingKey>) -> Self {
        Self::ConfigurationChanged {
            settings: keys.into_iter().map(|k| k.as_str().to_string()).collect(),
        }
    }

    /// Whether this notification may have changed the given setting
    pub fn affects(&self, key: SettingKey) -> bool {
        match self {
            SettingsEvent::ConfigurationChanged { settings } => {
                settings.iter().any(|s| s == key.as_str())
            }
            SettingsEvent::Reloaded => true,
        }
    }

    /// Whether any of the badge settings may have changed
    pub fn affects_badge(&self) -> bool {
        SettingKey::ALL.into_iter().any(|key| self.affects(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusmark_types::COLOR_CUSTOMIZATIONS_SETTING;

    #[test]
    fn test_changed_event_affects_listed_keys() {
        let event = SettingsEvent::changed([SettingKey::Name]);
        assert!(event.affects(SettingKey::Name));
        assert!(!event.affects(SettingKey::Emoji));
        assert!(event.affects_badge());
    }

    #[test]
    fn test_unrelated_settings_do_not_affect_badge() {
        let event = SettingsEvent::ConfigurationChanged {
            settings: vec![
                COLOR_CUSTOMIZATIONS_SETTING.to_string(),
                "editor.fontSize".to_string(),
            ],
        };
        assert!(!event.affects_badge());
    }

    #[test]
    fn test_reload_affects_everything() {
        assert!(SettingsEvent::Reloaded.affects(SettingKey::Color));
        assert!(SettingsEvent::Reloaded.affects_badge());
    }
}
