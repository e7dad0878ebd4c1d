// ABOUTME: Reads and writes the persisted badge configuration through the settings store
// ABOUTME: Writes are batched so a workflow persists all three keys as one update

use statusmark_logging::debug;
use statusmark_types::{BadgeConfig, SettingKey};

use crate::capabilities::{SettingChange, SettingsStore};
use crate::error::Result;

/// Read the badge configuration; missing keys read as empty strings
pub async fn read_badge_config(store: &dyn SettingsStore) -> Result<BadgeConfig> {
    let mut config = BadgeConfig::default();
    for key in SettingKey::ALL {
        let value = store.get(key).await?.unwrap_or_default();
        match key {
            SettingKey::Name => config.name = value,
            SettingKey::Color => config.color = value,
            SettingKey::Emoji => config.emoji = value,
        }
    }
    Ok(config)
}

/// Persist a badge configuration. An empty color is stored as unset.
pub async fn write_badge_config(store: &dyn SettingsStore, config: &BadgeConfig) -> Result<()> {
    let color = if config.color.trim().is_empty() {
        SettingChange::unset(SettingKey::Color)
    } else {
        SettingChange::set(SettingKey::Color, config.color.clone())
    };

    let changes = [
        SettingChange::set(SettingKey::Name, config.name.clone()),
        SettingChange::set(SettingKey::Emoji, config.emoji.clone()),
        color,
    ];

    debug!(
        name = %config.name,
        emoji = %config.emoji,
        color = %config.color,
        "Persisting badge configuration"
    );
    store.update(&changes).await
}

/// Remove all three badge settings
pub async fn clear_badge_config(store: &dyn SettingsStore) -> Result<()> {
    let changes: Vec<_> = SettingKey::ALL
        .into_iter()
        .map(SettingChange::unset)
        .collect();
    store.update(&changes).await
}
