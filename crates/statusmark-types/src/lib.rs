// ABOUTME: Pure data types with no cross-crate dependencies
// ABOUTME: Foundation layer for all other statusmark crates

pub mod badge;
pub mod keys;
pub mod outcome;
pub mod palette;

// Re-export commonly used types
pub use badge::BadgeConfig;
pub use keys::{COLOR_CUSTOMIZATIONS_SETTING, SettingKey, StatusBarKey};
pub use outcome::Outcome;
pub use palette::{BADGE_COLOR_PALETTE, EMOJI_PALETTE, PaletteEntry, STATUS_BAR_COLOR_PALETTE};
