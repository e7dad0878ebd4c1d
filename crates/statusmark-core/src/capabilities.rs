// ABOUTME: Capability traits describing the host services the workflows run against
// ABOUTME: Settings store, color customization map, status indicator, prompts and workspace probe

use async_trait::async_trait;
use statusmark_events::SettingsEvent;
use statusmark_types::SettingKey;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::picker::PickerItem;

/// The host's color customization map (`workbench.colorCustomizations`)
pub type ColorCustomizations = BTreeMap<String, String>;

/// One entry of a batched settings update. `None` removes the setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub key: SettingKey,
    pub value: Option<String>,
}

impl SettingChange {
    pub fn set(key: SettingKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: Some(value.into()),
        }
    }

    pub fn unset(key: SettingKey) -> Self {
        Self { key, value: None }
    }
}

/// Workspace-scoped badge settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting; `None` when it is not set
    async fn get(&self, key: SettingKey) -> Result<Option<String>>;

    /// Apply all changes as one logical update
    async fn update(&self, changes: &[SettingChange]) -> Result<()>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<SettingsEvent>;
}

/// The color customization map as it was before a preview touched it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSnapshot {
    pub map: Option<ColorCustomizations>,
    /// Store-specific verbatim copy, used to put the map back exactly as it was
    pub verbatim: Option<String>,
}

/// The host's color customization map, of which only the status bar keys are touched
#[async_trait]
pub trait ColorCustomizationStore: Send + Sync {
    /// Current map, `None` when the host has no customizations at all
    async fn color_customizations(&self) -> Result<Option<ColorCustomizations>>;

    /// Replace the map; `None` removes it
    async fn set_color_customizations(&self, value: Option<ColorCustomizations>) -> Result<()>;

    async fn snapshot(&self) -> Result<ColorSnapshot> {
        Ok(ColorSnapshot {
            map: self.color_customizations().await?,
            verbatim: None,
        })
    }

    /// Put back a snapshot taken by this store
    async fn restore(&self, snapshot: &ColorSnapshot) -> Result<()> {
        if self.color_customizations().await? == snapshot.map {
            return Ok(());
        }
        self.set_color_customizations(snapshot.map.clone()).await
    }
}

/// The single persistent label shown by the host
pub trait StatusIndicator: Send + Sync {
    fn set_text(&self, text: &str);

    /// `None` selects the surface's default color
    fn set_color(&self, color: Option<&str>);

    fn show(&self);

    fn hide(&self);
}

/// Whether a workspace or folder is open
pub trait WorkspaceProbe: Send + Sync {
    fn is_workspace_open(&self) -> bool;
}

/// Severity of a non-blocking notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Contents of a selectable-list prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub title: String,
    pub placeholder: String,
    pub items: Vec<PickerItem>,
    /// Item highlighted when the picker opens
    pub active: Option<usize>,
}

/// Contents of a single-line text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOptions {
    pub title: String,
    pub prompt: String,
    pub value: String,
    pub placeholder: Option<String>,
}

/// Notifications delivered by an open picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// The highlighted item changed
    ActiveChanged(Option<usize>),
    /// The selected item changed without being accepted
    SelectionChanged(Option<usize>),
    /// Explicit accept; carries the selected item, or the active one when nothing is selected
    Accepted(Option<usize>),
    /// Closed without accepting
    Hidden,
}

/// Notifications delivered by an open text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Changed(String),
    Accepted(String),
    Hidden,
}

/// An open picker. No events follow `Accepted` or `Hidden`.
#[async_trait]
pub trait PickerSession: Send {
    async fn next_event(&mut self) -> Result<PickerEvent>;
}

/// An open text prompt. No events follow `Accepted` or `Hidden`.
#[async_trait]
pub trait InputSession: Send {
    async fn next_event(&mut self) -> Result<InputEvent>;
}

/// Interactive surfaces provided by the host
#[async_trait]
pub trait PromptHost: Send + Sync {
    async fn open_picker(&self, options: PickerOptions) -> Result<Box<dyn PickerSession>>;

    async fn open_input(&self, options: InputOptions) -> Result<Box<dyn InputSession>>;

    /// Modal confirmation; true only when the user chose `action`
    async fn confirm(&self, message: &str, action: &str) -> Result<bool>;

    fn show_message(&self, level: MessageLevel, message: &str);
}

/// Every host service a workflow may touch
#[derive(Clone)]
pub struct HostServices {
    pub settings: Arc<dyn SettingsStore>,
    pub colors: Arc<dyn ColorCustomizationStore>,
    pub indicator: Arc<dyn StatusIndicator>,
    pub prompts: Arc<dyn PromptHost>,
    pub workspace: Arc<dyn WorkspaceProbe>,
}

impl HostServices {
    pub fn info(&self, message: &str) {
        self.prompts.show_message(MessageLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.prompts.show_message(MessageLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.prompts.show_message(MessageLevel::Error, message);
    }
}
