// ABOUTME: Badge workflows, pickers and color logic running against host capability traits
// ABOUTME: Hosts provide settings, color customizations, an indicator and prompts; this crate drives them

pub mod app;
pub mod badge;
pub mod capabilities;
pub mod color;
pub mod error;
pub mod picker;
pub mod prompt;
pub mod settings;
pub mod status_bar;
pub mod watcher;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(test)]
mod tests;

// Activation and commands
pub use app::StatusMark;

// Host capability exports
pub use capabilities::{
    ColorCustomizationStore, ColorCustomizations, ColorSnapshot, HostServices, InputEvent, InputOptions,
    InputSession, MessageLevel, PickerEvent, PickerOptions, PickerSession, PromptHost,
    SettingChange, SettingsStore, StatusIndicator, WorkspaceProbe,
};

pub use badge::{BadgeRenderer, BadgeView};
pub use color::{Rgb, contrasting_text_color, normalize_hex_color, parse_hex_color};
pub use error::{Result, StatusMarkError};
pub use picker::{ItemKind, PickerItem, Preview};
pub use status_bar::{ApplyColorOptions, apply_status_bar_color};
