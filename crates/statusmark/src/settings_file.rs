// ABOUTME: Settings and color customizations persisted in a JSON (or JSON with comments) settings file
// ABOUTME: Unrelated keys and key order survive every write; changes are broadcast to subscribers

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use statusmark_core::{
    ColorCustomizationStore, ColorCustomizations, ColorSnapshot, Result, SettingChange,
    SettingsStore, StatusMarkError,
};
use statusmark_events::SettingsEvent;
use statusmark_logging::{debug, warn};
use statusmark_types::{COLOR_CUSTOMIZATIONS_SETTING, SettingKey};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::broadcast;

/// Notifications buffered per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum SettingsFileError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },

    #[error("'{key}' in {path} must be a JSON object")]
    NotAMap { path: PathBuf, key: String },
}

type Settings = Map<String, Value>;

/// Parsed file contents
struct Document {
    settings: Settings,
    /// Only JSON5 could parse it, so comments and trailing commas are lost on write
    lenient: bool,
}

/// Verbatim snapshot of the color customization entry: its position among the
/// top-level keys and its value, `None` when the file had no such entry
#[derive(Debug, Serialize, Deserialize)]
struct SavedColors {
    entry: Option<(usize, Value)>,
}

/// Workspace settings file shared by the badge settings and the color customization map
pub struct JsonSettingsFile {
    path: PathBuf,
    // Serializes read-modify-write cycles
    write_lock: Mutex<()>,
    events: broadcast::Sender<SettingsEvent>,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            events,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tell subscribers the file changed on disk
    pub fn reload(&self) {
        debug!(path = %self.path.display(), "Settings file changed on disk");
        let _ = self.events.send(SettingsEvent::Reloaded);
    }

    fn read(&self) -> std::result::Result<Settings, SettingsFileError> {
        self.load().map(|document| document.settings)
    }

    fn load(&self) -> std::result::Result<Document, SettingsFileError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Document {
                    settings: Settings::new(),
                    lenient: false,
                });
            }
            Err(source) => {
                return Err(SettingsFileError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Document {
                settings: Settings::new(),
                lenient: false,
            });
        }

        // Editor settings files are JSON with comments more often than not
        let (value, lenient) = match serde_json::from_str::<Value>(&contents) {
            Ok(value) => (value, false),
            Err(json_error) => match json5::from_str::<Value>(&contents) {
                Ok(value) => (value, true),
                Err(json5_error) => {
                    debug!(error = %json5_error, "Settings file is not JSON5 either");
                    return Err(SettingsFileError::Parse {
                        path: self.path.clone(),
                        source: json_error,
                    });
                }
            },
        };

        match value {
            Value::Object(settings) => Ok(Document { settings, lenient }),
            _ => Err(SettingsFileError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    /// Write `settings` unless they match what was loaded. Returns whether the file was written.
    fn write_if_changed(
        &self,
        loaded: &Document,
        settings: &Settings,
    ) -> std::result::Result<bool, SettingsFileError> {
        // Map equality ignores order, so compare entry by entry
        if loaded.settings.iter().eq(settings.iter()) {
            return Ok(false);
        }
        if loaded.lenient {
            warn!(
                path = %self.path.display(),
                "Rewriting settings file as plain JSON, comments and trailing commas are dropped"
            );
        }
        self.write(settings)?;
        Ok(true)
    }

    fn write(&self, settings: &Settings) -> std::result::Result<(), SettingsFileError> {
        let io_error = |source| SettingsFileError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(io_error)?;

        let mut file = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
        {
            let mut serializer =
                Serializer::with_formatter(&mut file, PrettyFormatter::with_indent(b"    "));
            serde::Serialize::serialize(settings, &mut serializer).map_err(|source| {
                SettingsFileError::Parse {
                    path: self.path.clone(),
                    source,
                }
            })?;
        }
        file.write_all(b"\n").map_err(io_error)?;
        file.persist(&self.path).map_err(|e| io_error(e.error))?;
        Ok(())
    }

    fn notify(&self, settings: Vec<String>) {
        // No subscribers is fine
        let _ = self
            .events
            .send(SettingsEvent::ConfigurationChanged { settings });
    }
}

/// Render a setting value the way it is displayed
fn setting_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// String entries of the color customization object
fn string_entries(object: &Map<String, Value>) -> ColorCustomizations {
    object
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

/// Bring the string entries of `object` in line with `desired`.
///
/// Existing keys keep their position and non-string entries (such as per-theme
/// blocks) are left alone. New keys are appended.
fn merge_color_map(object: &mut Map<String, Value>, desired: &ColorCustomizations) {
    object.retain(|key, value| !value.is_string() || desired.contains_key(key));
    for (key, value) in desired {
        object.insert(key.clone(), Value::String(value.clone()));
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsFile {
    async fn get(&self, key: SettingKey) -> Result<Option<String>> {
        let settings = self
            .read()
            .map_err(|e| StatusMarkError::settings_read(key.as_str(), e))?;
        Ok(settings.get(key.as_str()).and_then(setting_text))
    }

    async fn update(&self, changes: &[SettingChange]) -> Result<()> {
        let written = {
            let _guard = self.write_lock.lock();
            let loaded = self.load().map_err(StatusMarkError::settings_write)?;
            let mut settings = loaded.settings.clone();
            for change in changes {
                match &change.value {
                    Some(value) => {
                        settings.insert(change.key.as_str().to_string(), Value::String(value.clone()));
                    }
                    None => settings.retain(|key, _| key != change.key.as_str()),
                }
            }
            self.write_if_changed(&loaded, &settings)
                .map_err(StatusMarkError::settings_write)?
        };
        if !written {
            return Ok(());
        }

        debug!(count = changes.len(), path = %self.path.display(), "Updated settings");
        self.notify(
            changes
                .iter()
                .map(|c| c.key.as_str().to_string())
                .collect(),
        );
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.events.subscribe()
    }
}

impl JsonSettingsFile {
    fn colors_of(&self, settings: &Settings) -> Option<ColorCustomizations> {
        match settings.get(COLOR_CUSTOMIZATIONS_SETTING) {
            None | Some(Value::Null) => None,
            Some(Value::Object(object)) => Some(string_entries(object)),
            Some(_) => {
                warn!(
                    path = %self.path.display(),
                    "Ignoring color customizations that are not an object"
                );
                None
            }
        }
    }
}

#[async_trait]
impl ColorCustomizationStore for JsonSettingsFile {
    async fn color_customizations(&self) -> Result<Option<ColorCustomizations>> {
        let settings = self.read().map_err(StatusMarkError::color_customizations)?;
        Ok(self.colors_of(&settings))
    }

    async fn set_color_customizations(&self, value: Option<ColorCustomizations>) -> Result<()> {
        let desired = value.unwrap_or_default();
        let written = {
            let _guard = self.write_lock.lock();
            let loaded = self.load().map_err(StatusMarkError::color_customizations)?;
            let mut settings = loaded.settings.clone();

            match settings.get_mut(COLOR_CUSTOMIZATIONS_SETTING) {
                Some(Value::Object(object)) => merge_color_map(object, &desired),
                None | Some(Value::Null) => {
                    let mut object = Map::new();
                    merge_color_map(&mut object, &desired);
                    settings.insert(COLOR_CUSTOMIZATIONS_SETTING.to_string(), Value::Object(object));
                }
                Some(_) => {
                    return Err(StatusMarkError::color_customizations(
                        SettingsFileError::NotAMap {
                            path: self.path.clone(),
                            key: COLOR_CUSTOMIZATIONS_SETTING.to_string(),
                        },
                    ));
                }
            }

            // An emptied map removes the setting itself
            settings.retain(|key, value| {
                key != COLOR_CUSTOMIZATIONS_SETTING
                    || value.as_object().is_some_and(|object| !object.is_empty())
            });

            self.write_if_changed(&loaded, &settings)
                .map_err(StatusMarkError::color_customizations)?
        };

        if written {
            self.notify(vec![COLOR_CUSTOMIZATIONS_SETTING.to_string()]);
        }
        Ok(())
    }

    async fn snapshot(&self) -> Result<ColorSnapshot> {
        let settings = self.read().map_err(StatusMarkError::color_customizations)?;
        let entry = settings
            .iter()
            .position(|(key, _)| key == COLOR_CUSTOMIZATIONS_SETTING)
            .zip(settings.get(COLOR_CUSTOMIZATIONS_SETTING).cloned());
        let verbatim = serde_json::to_string(&SavedColors { entry }).map_err(|source| {
            StatusMarkError::color_customizations(SettingsFileError::Parse {
                path: self.path.clone(),
                source,
            })
        })?;

        Ok(ColorSnapshot {
            map: self.colors_of(&settings),
            verbatim: Some(verbatim),
        })
    }

    async fn restore(&self, snapshot: &ColorSnapshot) -> Result<()> {
        let Some(verbatim) = snapshot.verbatim.as_deref() else {
            return self.set_color_customizations(snapshot.map.clone()).await;
        };
        let saved: SavedColors = serde_json::from_str(verbatim).map_err(|source| {
            StatusMarkError::color_customizations(SettingsFileError::Parse {
                path: self.path.clone(),
                source,
            })
        })?;

        let written = {
            let _guard = self.write_lock.lock();
            let loaded = self.load().map_err(StatusMarkError::color_customizations)?;
            let mut settings = loaded.settings.clone();
            settings.retain(|key, _| key != COLOR_CUSTOMIZATIONS_SETTING);

            if let Some((position, value)) = saved.entry {
                let mut entries: Vec<(String, Value)> = settings.into_iter().collect();
                let position = position.min(entries.len());
                entries.insert(position, (COLOR_CUSTOMIZATIONS_SETTING.to_string(), value));
                settings = entries.into_iter().collect();
            }

            self.write_if_changed(&loaded, &settings)
                .map_err(StatusMarkError::color_customizations)?
        };

        if written {
            debug!(path = %self.path.display(), "Restored color customizations");
            self.notify(vec![COLOR_CUSTOMIZATIONS_SETTING.to_string()]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusmark_core::Preview;
    use statusmark_core::status_bar::StatusBarPreview;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn settings_file(dir: &TempDir, contents: Option<&str>) -> JsonSettingsFile {
        let path = dir.path().join(".vscode").join("settings.json");
        if let Some(contents) = contents {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, contents).unwrap();
        }
        JsonSettingsFile::new(path)
    }

    fn on_disk(store: &JsonSettingsFile) -> Value {
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(&dir, None);

        assert_eq!(store.get(SettingKey::Name).await.unwrap(), None);
        assert_eq!(store.color_customizations().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_preserves_unrelated_keys_and_order() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(
            &dir,
            Some(r#"{"editor.fontSize": 14, "statusmark.name": "Old", "files.exclude": {"target": true}}"#),
        );

        store
            .update(&[
                SettingChange::set(SettingKey::Name, "API"),
                SettingChange::set(SettingKey::Emoji, "🔥"),
                SettingChange::unset(SettingKey::Color),
            ])
            .await
            .unwrap();

        let value = on_disk(&store);
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["editor.fontSize", "statusmark.name", "files.exclude", "statusmark.emoji"]
        );
        assert_eq!(value["statusmark.name"], "API");
        assert_eq!(value["files.exclude"]["target"], true);
        assert_eq!(store.get(SettingKey::Emoji).await.unwrap().as_deref(), Some("🔥"));
    }

    #[tokio::test]
    async fn test_update_broadcasts_changed_keys() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(&dir, None);
        let mut events = store.subscribe();

        store
            .update(&[SettingChange::set(SettingKey::Name, "API")])
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert!(event.affects(SettingKey::Name));
        assert!(!event.affects(SettingKey::Color));
    }

    #[tokio::test]
    async fn test_color_map_merge_keeps_foreign_entries() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(
            &dir,
            Some(
                r##"{
    "workbench.colorCustomizations": {
        "tab.activeBorder": "#ff0000",
        "[Default Dark+]": {"editor.background": "#000000"},
        "statusBar.background": "#111111"
    },
    "editor.tabSize": 4
}"##,
            ),
        );

        let mut map = store.color_customizations().await.unwrap().unwrap();
        assert_eq!(map.len(), 2);
        map.insert("statusBar.background".to_string(), "#1E3A8A".to_string());
        map.insert("statusBar.foreground".to_string(), "#ffffff".to_string());
        store.set_color_customizations(Some(map)).await.unwrap();

        let value = on_disk(&store);
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["workbench.colorCustomizations", "editor.tabSize"]);

        let colors = &value["workbench.colorCustomizations"];
        assert_eq!(colors["tab.activeBorder"], "#ff0000");
        assert_eq!(colors["[Default Dark+]"]["editor.background"], "#000000");
        assert_eq!(colors["statusBar.background"], "#1E3A8A");
        assert_eq!(colors["statusBar.foreground"], "#ffffff");
    }

    #[tokio::test]
    async fn test_removing_last_color_drops_the_setting() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(
            &dir,
            Some(r##"{"workbench.colorCustomizations": {"statusBar.background": "#111111"}, "a": 1}"##),
        );

        store.set_color_customizations(None).await.unwrap();

        let value = on_disk(&store);
        assert!(value.get(COLOR_CUSTOMIZATIONS_SETTING).is_none());
        assert_eq!(value["a"], 1);
        assert_eq!(store.color_customizations().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_store_failure() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(&dir, Some("{ not json"));

        let error = store.get(SettingKey::Name).await.unwrap_err();

        assert!(error.is_store_failure());
        assert!(error.to_string().contains("statusmark.name"));
    }

    #[tokio::test]
    async fn test_non_string_values_are_displayed() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(&dir, Some(r#"{"statusmark.name": 42, "statusmark.emoji": null}"#));

        assert_eq!(store.get(SettingKey::Name).await.unwrap().as_deref(), Some("42"));
        assert_eq!(store.get(SettingKey::Emoji).await.unwrap(), None);
    }

    const PREVIEWED: &str = r##"{
    "editor.tabSize": 4,
    "workbench.colorCustomizations": {
        "statusBar.background": "#059669",
        "statusBar.foreground": "#ffffff",
        "tab.activeBorder": "#ff0000"
    },
    "files.exclude": {
        "target": true
    }
}
"##;

    async fn capture(store: &Arc<JsonSettingsFile>) -> StatusBarPreview {
        StatusBarPreview::capture(store.clone()).await.unwrap()
    }

    #[tokio::test]
    async fn test_cancelled_preview_restores_file_exactly() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(settings_file(&dir, Some(PREVIEWED)));
        let preview = capture(&store).await;

        preview.preview("").await.unwrap();
        let colors = &on_disk(&store)[COLOR_CUSTOMIZATIONS_SETTING];
        assert_eq!(colors.as_object().unwrap().len(), 1);

        preview.restore().await.unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), PREVIEWED);
    }

    #[tokio::test]
    async fn test_restore_puts_removed_setting_back_in_place() {
        let dir = TempDir::new().unwrap();
        let original = r##"{
    "editor.tabSize": 4,
    "workbench.colorCustomizations": {
        "statusBar.background": "#059669",
        "statusBar.foreground": "#ffffff"
    },
    "editor.rulers": [
        100
    ]
}
"##;
        let store = Arc::new(settings_file(&dir, Some(original)));
        let preview = capture(&store).await;

        preview.preview("").await.unwrap();
        assert!(on_disk(&store).get(COLOR_CUSTOMIZATIONS_SETTING).is_none());
        preview.preview("#7C3AED").await.unwrap();

        preview.restore().await.unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), original);
    }

    #[tokio::test]
    async fn test_cancelled_preview_never_creates_the_file() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(settings_file(&dir, None));
        let mut events = store.subscribe();
        let preview = capture(&store).await;

        preview.preview("").await.unwrap();
        preview.restore().await.unwrap();

        assert!(!store.path().exists());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_restore_after_colors_were_added_to_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(settings_file(&dir, Some(r#"{"a": 1}"#)));
        let preview = capture(&store).await;

        preview.preview("#7C3AED").await.unwrap();
        assert!(on_disk(&store).get(COLOR_CUSTOMIZATIONS_SETTING).is_some());

        preview.restore().await.unwrap();
        assert_eq!(on_disk(&store), serde_json::json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_unchanged_update_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"statusmark.name":"API"}"#;
        let store = settings_file(&dir, Some(original));

        store
            .update(&[
                SettingChange::set(SettingKey::Name, "API"),
                SettingChange::unset(SettingKey::Emoji),
            ])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), original);
    }

    #[tokio::test]
    async fn test_settings_with_comments_are_read() {
        let dir = TempDir::new().unwrap();
        let store = settings_file(
            &dir,
            Some(
                r##"{
    // Workspace label
    "statusmark.name": "API",
    "workbench.colorCustomizations": {
        "statusBar.background": "#1E3A8A", /* dark */
    },
}"##,
            ),
        );

        assert_eq!(store.get(SettingKey::Name).await.unwrap().as_deref(), Some("API"));
        let colors = store.color_customizations().await.unwrap().unwrap();
        assert_eq!(colors["statusBar.background"], "#1E3A8A");

        store
            .update(&[SettingChange::set(SettingKey::Emoji, "🔥")])
            .await
            .unwrap();
        let value = on_disk(&store);
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["statusmark.name", "workbench.colorCustomizations", "statusmark.emoji"]
        );
    }
}
