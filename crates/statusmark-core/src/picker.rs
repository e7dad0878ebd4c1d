// ABOUTME: Palette picker protocol with live preview and rollback on cancellation
// ABOUTME: Shared by the emoji, badge color and status bar color steps

use async_trait::async_trait;
use statusmark_logging::{debug, warn};
use statusmark_types::{Outcome, PaletteEntry};

use crate::capabilities::{PickerEvent, PickerOptions, PromptHost};
use crate::error::Result;
use crate::prompt::{prompt_custom_emoji, prompt_hex_color};

pub const CUSTOM_LABEL: &str = "Custom…";

/// How a palette entry is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Color,
    Emoji,
}

/// A row in a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub description: Option<String>,
    /// Palette value; for the custom row, the seed carried over from the current setting
    pub value: Option<String>,
    pub kind: ItemKind,
    pub is_custom: bool,
    pub picked: bool,
}

/// Project a palette onto picker rows, followed by the custom row.
///
/// A palette entry is picked when its value matches the trimmed initial
/// value, ignoring ASCII case. When nothing matches, a non-empty initial value
/// becomes the custom row's seed.
pub fn build_items(
    palette: &[PaletteEntry],
    initial: &str,
    kind: ItemKind,
    custom_description: &str,
) -> Vec<PickerItem> {
    let trimmed = initial.trim();

    let mut items: Vec<PickerItem> = palette
        .iter()
        .map(|entry| PickerItem {
            label: match kind {
                ItemKind::Color => entry.display_name.to_string(),
                ItemKind::Emoji => format!("{} {}", entry.value, entry.display_name)
                    .trim()
                    .to_string(),
            },
            description: match kind {
                ItemKind::Color if !entry.value.is_empty() => Some(entry.value.to_string()),
                _ => None,
            },
            value: Some(entry.value.to_string()),
            kind,
            is_custom: false,
            picked: entry.value.eq_ignore_ascii_case(trimmed),
        })
        .collect();

    let any_picked = items.iter().any(|item| item.picked);
    items.push(PickerItem {
        label: CUSTOM_LABEL.to_string(),
        description: Some(custom_description.to_string()),
        value: (!trimmed.is_empty() && !any_picked).then(|| trimmed.to_string()),
        kind,
        is_custom: true,
        picked: false,
    });

    items
}

/// Live preview target of a picker
#[async_trait]
pub trait Preview: Send + Sync {
    /// Show `value` as if it had been chosen
    async fn preview(&self, value: &str) -> Result<()>;

    /// Put back whatever was visible before the picker opened
    async fn restore(&self) -> Result<()>;
}

/// Resolve-once guard for a picker or prompt
#[derive(Debug)]
pub struct Settlement<T> {
    outcome: Option<Outcome<T>>,
}

impl<T> Default for Settlement<T> {
    fn default() -> Self {
        Self { outcome: None }
    }
}

impl<T> Settlement<T> {
    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record the outcome. Returns false, keeping the first outcome, when already settled.
    pub fn settle(&mut self, outcome: Outcome<T>) -> bool {
        if self.outcome.is_some() {
            warn!("Ignoring second resolution of an already settled prompt");
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn into_outcome(self) -> Option<Outcome<T>> {
        self.outcome
    }
}

/// Free-text prompt behind the custom row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomPrompt {
    HexColor {
        title: &'static str,
        prompt: &'static str,
    },
    Emoji {
        title: &'static str,
        prompt: &'static str,
    },
}

impl CustomPrompt {
    fn kind(self) -> ItemKind {
        match self {
            CustomPrompt::HexColor { .. } => ItemKind::Color,
            CustomPrompt::Emoji { .. } => ItemKind::Emoji,
        }
    }

    fn description(self) -> &'static str {
        match self {
            CustomPrompt::HexColor { .. } => "Enter a custom hexadecimal color",
            CustomPrompt::Emoji { .. } => "Enter a custom emoji",
        }
    }

    async fn run(self, prompts: &dyn PromptHost, seed: &str) -> Result<Outcome<String>> {
        match self {
            CustomPrompt::HexColor { title, prompt } => {
                prompt_hex_color(prompts, title, prompt, seed).await
            }
            CustomPrompt::Emoji { title, prompt } => {
                prompt_custom_emoji(prompts, title, prompt, seed).await
            }
        }
    }
}

/// A palette picker with a custom escape hatch
#[derive(Debug, Clone, Copy)]
pub struct ChoicePicker<'a> {
    pub title: &'a str,
    pub placeholder: &'a str,
    pub palette: &'a [PaletteEntry],
    pub custom: CustomPrompt,
}

impl ChoicePicker<'_> {
    /// Run the picker to a single resolution, previewing as the user moves
    pub async fn pick(
        &self,
        prompts: &dyn PromptHost,
        initial: &str,
        preview: &dyn Preview,
    ) -> Result<Outcome<String>> {
        let trimmed_initial = initial.trim();
        let items = build_items(
            self.palette,
            initial,
            self.custom.kind(),
            self.custom.description(),
        );

        let active = match items.iter().position(|item| item.picked) {
            Some(index) => {
                let value = items[index].value.clone().unwrap_or_default();
                preview.preview(&value).await?;
                Some(index)
            }
            None if !trimmed_initial.is_empty() => {
                preview.preview(trimmed_initial).await?;
                Some(items.len() - 1)
            }
            None => None,
        };

        debug!(
            title = self.title,
            initial = trimmed_initial,
            active = ?active,
            "Opening picker"
        );

        let mut session = prompts
            .open_picker(PickerOptions {
                title: self.title.to_string(),
                placeholder: self.placeholder.to_string(),
                items: items.clone(),
                active,
            })
            .await?;

        let mut settlement = Settlement::default();
        while !settlement.is_settled() {
            match session.next_event().await? {
                PickerEvent::ActiveChanged(index) | PickerEvent::SelectionChanged(index) => {
                    if let Some(item) = index.and_then(|i| items.get(i)) {
                        if !item.is_custom {
                            preview
                                .preview(item.value.as_deref().unwrap_or_default())
                                .await?;
                        }
                    }
                }
                PickerEvent::Accepted(index) => {
                    let outcome = self
                        .commit(prompts, index.and_then(|i| items.get(i)), initial, preview)
                        .await?;
                    settlement.settle(outcome);
                }
                PickerEvent::Hidden => {
                    debug!(title = self.title, "Picker dismissed");
                    preview.restore().await?;
                    settlement.settle(Outcome::Cancelled);
                }
            }
        }

        Ok(settlement.into_outcome().unwrap_or(Outcome::Cancelled))
    }

    async fn commit(
        &self,
        prompts: &dyn PromptHost,
        selected: Option<&PickerItem>,
        initial: &str,
        preview: &dyn Preview,
    ) -> Result<Outcome<String>> {
        let Some(item) = selected else {
            preview.restore().await?;
            return Ok(Outcome::Cancelled);
        };

        let value = if item.is_custom {
            let seed = item.value.as_deref().unwrap_or(initial.trim());
            match self.custom.run(prompts, seed).await? {
                Outcome::Committed(value) => value,
                Outcome::Cancelled => {
                    preview.restore().await?;
                    return Ok(Outcome::Cancelled);
                }
            }
        } else {
            item.value.clone().unwrap_or_default()
        };

        preview.preview(&value).await?;
        Ok(Outcome::Committed(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::InputEvent;
    use crate::testing::ScriptedPrompts;
    use parking_lot::Mutex;
    use statusmark_types::{BADGE_COLOR_PALETTE, EMOJI_PALETTE};

    #[derive(Default)]
    struct RecordingPreview {
        shown: Mutex<Vec<String>>,
        restores: Mutex<usize>,
    }

    #[async_trait]
    impl Preview for RecordingPreview {
        async fn preview(&self, value: &str) -> Result<()> {
            self.shown.lock().push(value.to_string());
            Ok(())
        }

        async fn restore(&self) -> Result<()> {
            *self.restores.lock() += 1;
            Ok(())
        }
    }

    const COLOR_PICKER: ChoicePicker<'static> = ChoicePicker {
        title: "Badge Text Color",
        placeholder: "Pick a color",
        palette: BADGE_COLOR_PALETTE,
        custom: CustomPrompt::HexColor {
            title: "Badge Text Color",
            prompt: "Enter a color",
        },
    };

    #[test]
    fn test_build_items_marks_case_insensitive_match() {
        let items = build_items(
            BADGE_COLOR_PALETTE,
            " #0ea5e9 ",
            ItemKind::Color,
            "Enter a custom hexadecimal color",
        );

        assert_eq!(items.len(), BADGE_COLOR_PALETTE.len() + 1);
        let picked: Vec<_> = items.iter().filter(|i| i.picked).collect();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].label, "Sky Blue");
        assert_eq!(picked[0].description.as_deref(), Some("#0EA5E9"));

        let custom = items.last().unwrap();
        assert!(custom.is_custom);
        assert_eq!(custom.label, CUSTOM_LABEL);
        assert_eq!(custom.value, None);
    }

    #[test]
    fn test_build_items_seeds_custom_row() {
        let items = build_items(BADGE_COLOR_PALETTE, "#123456", ItemKind::Color, "custom");

        assert!(items.iter().all(|i| !i.picked));
        assert_eq!(items.last().unwrap().value.as_deref(), Some("#123456"));
    }

    #[test]
    fn test_build_items_empty_initial_picks_default_entry() {
        let items = build_items(EMOJI_PALETTE, "", ItemKind::Emoji, "Enter a custom emoji");

        let picked: Vec<_> = items.iter().filter(|i| i.picked).collect();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].label, "Empty");
        assert_eq!(items.last().unwrap().value, None);
    }

    #[test]
    fn test_emoji_labels_include_glyph() {
        let items = build_items(EMOJI_PALETTE, "🔥", ItemKind::Emoji, "Enter a custom emoji");
        assert_eq!(items[0].label, "🚀 Rocket");
        assert!(items[3].picked);
        assert_eq!(items[3].description, None);
    }

    #[test]
    fn test_settlement_resolves_once() {
        let mut settlement = Settlement::default();
        assert!(!settlement.is_settled());
        assert!(settlement.settle(Outcome::Committed("#FFFFFF".to_string())));
        assert!(!settlement.settle(Outcome::Cancelled));
        assert_eq!(
            settlement.into_outcome(),
            Some(Outcome::Committed("#FFFFFF".to_string()))
        );
    }

    #[tokio::test]
    async fn test_off_palette_initial_previews_and_seeds_custom_prompt() {
        let custom = BADGE_COLOR_PALETTE.len();
        let prompts = ScriptedPrompts::default();
        prompts.push_picker([
            PickerEvent::ActiveChanged(Some(0)),
            PickerEvent::ActiveChanged(Some(custom)),
            PickerEvent::Accepted(Some(custom)),
        ]);
        prompts.push_input([InputEvent::Accepted("abcdef".to_string())]);
        let preview = RecordingPreview::default();

        let outcome = COLOR_PICKER.pick(&prompts, " #123456 ", &preview).await.unwrap();

        assert_eq!(outcome, Outcome::Committed("#abcdef".to_string()));
        assert_eq!(prompts.opened_pickers()[0].active, Some(custom));
        assert_eq!(prompts.opened_inputs()[0].value, "#123456");
        // Opening preview, the highlighted entry, nothing for the custom row, then the commit
        assert_eq!(
            *preview.shown.lock(),
            vec![
                "#123456".to_string(),
                BADGE_COLOR_PALETTE[0].value.to_string(),
                "#abcdef".to_string(),
            ]
        );
        assert_eq!(*preview.restores.lock(), 0);
    }

    #[tokio::test]
    async fn test_dismissed_picker_restores_once() {
        let prompts = ScriptedPrompts::default();
        prompts.push_picker([PickerEvent::ActiveChanged(Some(2)), PickerEvent::Hidden]);
        let preview = RecordingPreview::default();

        let outcome = COLOR_PICKER.pick(&prompts, "#123456", &preview).await.unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(*preview.restores.lock(), 1);
        assert_eq!(preview.shown.lock().len(), 2);
    }
}
