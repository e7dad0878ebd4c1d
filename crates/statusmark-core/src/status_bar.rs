// ABOUTME: Status bar color overrides inside the host's color customization map
// ABOUTME: Applies, removes and previews the two status bar keys, leaving foreign keys untouched

use async_trait::async_trait;
use statusmark_logging::{debug, info};
use statusmark_types::{Outcome, STATUS_BAR_COLOR_PALETTE, StatusBarKey};
use std::sync::Arc;

use crate::capabilities::{
    ColorCustomizationStore, ColorCustomizations, ColorSnapshot, HostServices,
};
use crate::color::{contrasting_text_color, normalize_hex_color, parse_hex_color};
use crate::error::Result;
use crate::picker::{ChoicePicker, CustomPrompt, Preview};
use crate::prompt::INVALID_COLOR_MESSAGE;

pub const RESET_TO_DEFAULT_MESSAGE: &str = "Status bar color reset to the theme default.";
pub const APPLY_CONFIRMATION: &str = "This will update the status bar color for this workspace.";
pub const APPLY_ACTION: &str = "Apply";

pub const STATUS_BAR_PICKER: ChoicePicker<'static> = ChoicePicker {
    title: "Status Bar Color",
    placeholder: "Select a status bar color or choose Custom… to enter your own.",
    palette: STATUS_BAR_COLOR_PALETTE,
    custom: CustomPrompt::HexColor {
        title: "Status Bar Color",
        prompt: "Enter the background color for the status bar in hexadecimal format (#RRGGBB).",
    },
};

/// Options for [`apply_status_bar_color`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyColorOptions {
    /// Apply without the modal confirmation
    pub skip_confirmation: bool,
    /// Suppress informational and error messages
    pub silent: bool,
}

/// The current status bar background override, or an empty string
pub fn background_of(map: Option<&ColorCustomizations>) -> String {
    map.and_then(|m| m.get(StatusBarKey::Background.as_str()))
        .cloned()
        .unwrap_or_default()
}

/// Remove both status bar keys. The map disappears when nothing else is left in it.
pub fn without_status_bar_color(map: Option<ColorCustomizations>) -> Option<ColorCustomizations> {
    let mut map = map.unwrap_or_default();
    for key in StatusBarKey::ALL {
        map.remove(key.as_str());
    }
    (!map.is_empty()).then_some(map)
}

/// Set the background to `color` and the foreground to its contrasting text color.
/// `color` must already be normalized.
pub fn with_status_bar_color(map: Option<ColorCustomizations>, color: &str) -> ColorCustomizations {
    let mut map = map.unwrap_or_default();
    map.insert(StatusBarKey::Background.as_str().to_string(), color.to_string());
    map.insert(
        StatusBarKey::Foreground.as_str().to_string(),
        contrasting_text_color(color).to_string(),
    );
    map
}

/// Write `color` as the status bar override; an empty color removes the override.
///
/// Returns false when nothing was written, either because the color is not a
/// valid hex value or because the user declined the confirmation.
pub async fn apply_status_bar_color(
    host: &HostServices,
    color: &str,
    options: ApplyColorOptions,
) -> Result<bool> {
    let current = host.colors.color_customizations().await?;
    let trimmed = color.trim();

    if trimmed.is_empty() {
        host.colors
            .set_color_customizations(without_status_bar_color(current))
            .await?;
        if !options.silent {
            host.info(RESET_TO_DEFAULT_MESSAGE);
        }
        return Ok(true);
    }

    let normalized = normalize_hex_color(trimmed);
    if parse_hex_color(&normalized).is_none() {
        if !options.silent {
            host.error(INVALID_COLOR_MESSAGE);
        }
        return Ok(false);
    }

    if !options.skip_confirmation
        && !host
            .prompts
            .confirm(APPLY_CONFIRMATION, APPLY_ACTION)
            .await?
    {
        info!(color = %normalized, "Status bar color change declined");
        return Ok(false);
    }

    host.colors
        .set_color_customizations(Some(with_status_bar_color(current, &normalized)))
        .await?;
    Ok(true)
}

/// Previews colors on the status bar and restores the whole map on rollback
pub struct StatusBarPreview {
    colors: Arc<dyn ColorCustomizationStore>,
    snapshot: ColorSnapshot,
}

impl StatusBarPreview {
    /// Snapshot the color customization map as it is now
    pub async fn capture(colors: Arc<dyn ColorCustomizationStore>) -> Result<Self> {
        let snapshot = colors.snapshot().await?;
        Ok(Self { colors, snapshot })
    }

    /// Status bar background at capture time, or an empty string
    pub fn original_background(&self) -> String {
        background_of(self.snapshot.map.as_ref())
    }
}

#[async_trait]
impl Preview for StatusBarPreview {
    async fn preview(&self, value: &str) -> Result<()> {
        let current = self.colors.color_customizations().await?;
        let trimmed = value.trim();

        let next = if trimmed.is_empty() {
            without_status_bar_color(current.clone())
        } else {
            let normalized = normalize_hex_color(trimmed);
            if parse_hex_color(&normalized).is_none() {
                debug!(value = trimmed, "Skipping preview of invalid status bar color");
                return Ok(());
            }
            Some(with_status_bar_color(current.clone(), &normalized))
        };

        if next == current {
            return Ok(());
        }
        debug!(value = trimmed, target_surface = "status_bar", "Previewing color");
        self.colors.set_color_customizations(next).await
    }

    async fn restore(&self) -> Result<()> {
        self.colors.restore(&self.snapshot).await
    }
}

/// Run the status bar picker against an already captured preview
pub async fn pick_status_bar_color(
    host: &HostServices,
    preview: &StatusBarPreview,
) -> Result<Outcome<String>> {
    let initial = preview.original_background();
    STATUS_BAR_PICKER
        .pick(host.prompts.as_ref(), &initial, preview)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryColors, TestHost, color_map};
    use statusmark_types::STATUS_BAR_COLOR_PALETTE;

    #[test]
    fn test_reset_preserves_foreign_keys() {
        let map = color_map(&[
            ("statusBar.background", "#111"),
            ("unrelated.key", "x"),
        ]);

        let result = without_status_bar_color(Some(map));

        assert_eq!(result, Some(color_map(&[("unrelated.key", "x")])));
    }

    #[test]
    fn test_reset_drops_map_when_empty() {
        let map = color_map(&[
            ("statusBar.background", "#1E3A8A"),
            ("statusBar.foreground", "#ffffff"),
        ]);

        assert_eq!(without_status_bar_color(Some(map)), None);
        assert_eq!(without_status_bar_color(None), None);
    }

    #[test]
    fn test_with_status_bar_color_sets_contrast() {
        let map = with_status_bar_color(Some(color_map(&[("editor.background", "#000")])), "#F59E0B");

        assert_eq!(
            map,
            color_map(&[
                ("editor.background", "#000"),
                ("statusBar.background", "#F59E0B"),
                ("statusBar.foreground", "#000000"),
            ])
        );
    }

    #[tokio::test]
    async fn test_apply_requires_confirmation() {
        let host = TestHost::new();
        host.prompts.push_confirm(false);

        let applied = apply_status_bar_color(&host.services(), "1e3a8a", ApplyColorOptions::default())
            .await
            .unwrap();

        assert!(!applied);
        assert_eq!(host.colors.current(), None);

        host.prompts.push_confirm(true);
        let applied = apply_status_bar_color(&host.services(), "1e3a8a", ApplyColorOptions::default())
            .await
            .unwrap();

        assert!(applied);
        assert_eq!(
            host.colors.current(),
            Some(color_map(&[
                ("statusBar.background", "#1e3a8a"),
                ("statusBar.foreground", "#ffffff"),
            ]))
        );
    }

    #[tokio::test]
    async fn test_apply_rejects_invalid_color() {
        let host = TestHost::new();

        let applied = apply_status_bar_color(
            &host.services(),
            "#12",
            ApplyColorOptions {
                skip_confirmation: true,
                silent: false,
            },
        )
        .await
        .unwrap();

        assert!(!applied);
        assert_eq!(host.colors.write_count(), 0);
        assert_eq!(
            host.prompts.messages(),
            vec![(
                crate::capabilities::MessageLevel::Error,
                INVALID_COLOR_MESSAGE.to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_apply_empty_resets_without_confirmation() {
        let host = TestHost::new();
        host.colors.set(Some(color_map(&[
            ("statusBar.background", "#111111"),
            ("statusBar.foreground", "#ffffff"),
            ("unrelated.key", "x"),
        ])));

        let applied = apply_status_bar_color(&host.services(), "", ApplyColorOptions::default())
            .await
            .unwrap();

        assert!(applied);
        assert_eq!(host.colors.current(), Some(color_map(&[("unrelated.key", "x")])));
        assert_eq!(
            host.prompts.messages(),
            vec![(
                crate::capabilities::MessageLevel::Info,
                RESET_TO_DEFAULT_MESSAGE.to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_preview_restore_reinstates_whole_map() {
        let colors = Arc::new(MemoryColors::with(Some(color_map(&[
            ("statusBar.background", "#059669"),
            ("statusBar.foreground", "#ffffff"),
            ("tab.activeBorder", "#ff0000"),
        ]))));
        let original = colors.current();
        let preview = StatusBarPreview::capture(colors.clone()).await.unwrap();
        assert_eq!(preview.original_background(), "#059669");

        preview.preview(STATUS_BAR_COLOR_PALETTE[3].value).await.unwrap();
        assert_eq!(
            background_of(colors.current().as_ref()),
            STATUS_BAR_COLOR_PALETTE[3].value
        );

        preview.preview("").await.unwrap();
        assert_eq!(colors.current(), Some(color_map(&[("tab.activeBorder", "#ff0000")])));

        preview.restore().await.unwrap();
        assert_eq!(colors.current(), original);
    }

    #[tokio::test]
    async fn test_preview_of_current_state_writes_nothing() {
        let colors = Arc::new(MemoryColors::default());
        let preview = StatusBarPreview::capture(colors.clone()).await.unwrap();

        // Theme Default over a map with no override
        preview.preview("").await.unwrap();
        assert_eq!(colors.write_count(), 0);

        colors.set(Some(color_map(&[
            ("statusBar.background", "#1E3A8A"),
            ("statusBar.foreground", "#ffffff"),
        ])));
        preview.preview("#1e3a8a").await.unwrap();
        assert_eq!(colors.write_count(), 1);
        preview.preview("#1e3a8a").await.unwrap();
        assert_eq!(colors.write_count(), 1);
    }

    #[tokio::test]
    async fn test_restore_removes_map_that_did_not_exist() {
        let colors = Arc::new(MemoryColors::default());
        let preview = StatusBarPreview::capture(colors.clone()).await.unwrap();

        preview.preview("#7C3AED").await.unwrap();
        assert!(colors.current().is_some());

        preview.restore().await.unwrap();
        assert_eq!(colors.current(), None);
    }
}
