// ABOUTME: The configure, status bar color and reset workflows
// ABOUTME: Each step previews live and a cancelled step rolls the badge back to its snapshot

use async_trait::async_trait;
use statusmark_logging::{info, instrument};
use statusmark_types::{BADGE_COLOR_PALETTE, BadgeConfig, EMOJI_PALETTE, Outcome};

use crate::badge::BadgeRenderer;
use crate::capabilities::{HostServices, SettingsStore};
use crate::error::Result;
use crate::picker::{ChoicePicker, CustomPrompt, Preview};
use crate::prompt::prompt_project_name;
use crate::settings::{clear_badge_config, read_badge_config, write_badge_config};
use crate::status_bar::{
    ApplyColorOptions, StatusBarPreview, apply_status_bar_color, pick_status_bar_color,
    without_status_bar_color,
};

pub const NO_WORKSPACE_MESSAGE: &str =
    "StatusMark requires an open workspace or folder. Please open a folder or workspace first.";
pub const RESET_CONFIRMATION: &str =
    "This will reset the StatusMark label and status bar colors in this workspace.";
pub const RESET_ACTION: &str = "Reset";
pub const RESET_DONE_MESSAGE: &str = "StatusMark settings reset for this workspace.";

pub const EMOJI_PICKER: ChoicePicker<'static> = ChoicePicker {
    title: "Project Emoji",
    placeholder: "Pick an emoji or choose Custom… to enter your own.",
    palette: EMOJI_PALETTE,
    custom: CustomPrompt::Emoji {
        title: "Project Emoji",
        prompt: "Enter the emoji that accompanies the project name.",
    },
};

pub const BADGE_COLOR_PICKER: ChoicePicker<'static> = ChoicePicker {
    title: "Badge Text Color",
    placeholder: "Select a text color for the badge or choose Custom… to enter your own.",
    palette: BADGE_COLOR_PALETTE,
    custom: CustomPrompt::HexColor {
        title: "Badge Text Color",
        prompt: "Enter the color in hexadecimal format (#RRGGBB).",
    },
};

/// Badge field a picker previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BadgeField {
    Emoji,
    Color,
}

/// Previews one badge field on top of the values chosen so far
struct BadgePreview<'a> {
    renderer: &'a BadgeRenderer,
    base: BadgeConfig,
    field: BadgeField,
}

#[async_trait]
impl Preview for BadgePreview<'_> {
    async fn preview(&self, value: &str) -> Result<()> {
        let base = &self.base;
        match self.field {
            BadgeField::Emoji => self.renderer.render(value, &base.name, &base.color),
            BadgeField::Color => self.renderer.render(&base.emoji, &base.name, value),
        }
        Ok(())
    }

    async fn restore(&self) -> Result<()> {
        self.renderer.refresh(&self.base);
        Ok(())
    }
}

/// Show the no-workspace warning and return false when no workspace is open
pub fn ensure_workspace(host: &HostServices) -> bool {
    if host.workspace.is_workspace_open() {
        return true;
    }
    host.warn(NO_WORKSPACE_MESSAGE);
    false
}

/// Render the indicator from the persisted settings
pub async fn refresh_indicator(
    settings: &dyn SettingsStore,
    renderer: &BadgeRenderer,
) -> Result<BadgeConfig> {
    let config = read_badge_config(settings).await?;
    renderer.refresh(&config);
    Ok(config)
}

/// Name, emoji and badge color, then persist, then the chained status bar color step.
///
/// Returns the persisted configuration, or `Cancelled` when a badge step was
/// abandoned and nothing was written. Cancelling only the status bar step still
/// returns the persisted badge.
#[instrument(skip_all)]
pub async fn configure_badge(host: &HostServices) -> Result<Outcome<BadgeConfig>> {
    if !ensure_workspace(host) {
        return Ok(Outcome::Cancelled);
    }

    let renderer = BadgeRenderer::new(host.indicator.clone());
    let snapshot = read_badge_config(host.settings.as_ref()).await?;
    let prompts = host.prompts.as_ref();

    let rollback = |step: &str| -> Result<Outcome<BadgeConfig>> {
        info!(step, "Badge configuration cancelled");
        renderer.refresh(&snapshot);
        Ok(Outcome::Cancelled)
    };

    let Outcome::Committed(name) = prompt_project_name(prompts, &renderer, &snapshot).await?
    else {
        return rollback("name");
    };

    let emoji_preview = BadgePreview {
        renderer: &renderer,
        base: BadgeConfig::new(name.clone(), snapshot.emoji.clone(), snapshot.color.clone()),
        field: BadgeField::Emoji,
    };
    let Outcome::Committed(emoji) = EMOJI_PICKER
        .pick(prompts, &snapshot.emoji, &emoji_preview)
        .await?
    else {
        return rollback("emoji");
    };

    let color_preview = BadgePreview {
        renderer: &renderer,
        base: BadgeConfig::new(name.clone(), emoji.clone(), snapshot.color.clone()),
        field: BadgeField::Color,
    };
    let Outcome::Committed(color) = BADGE_COLOR_PICKER
        .pick(prompts, &snapshot.color, &color_preview)
        .await?
    else {
        return rollback("color");
    };

    let chosen = BadgeConfig::new(name, emoji, color.trim());
    renderer.refresh(&chosen);
    write_badge_config(host.settings.as_ref(), &chosen).await?;
    let persisted = refresh_indicator(host.settings.as_ref(), &renderer).await?;
    info!(text = %persisted.display_text(), color = %persisted.color, "Badge configured");

    let preview = StatusBarPreview::capture(host.colors.clone()).await?;
    if let Outcome::Committed(color) = pick_status_bar_color(host, &preview).await? {
        apply_status_bar_color(
            host,
            &color,
            ApplyColorOptions {
                skip_confirmation: true,
                silent: true,
            },
        )
        .await?;
    }

    Ok(Outcome::Committed(persisted))
}

/// Standalone status bar color command.
///
/// A non-empty color is applied only after confirmation; declining puts the
/// map back as it was before the picker opened. Returns whether anything was applied.
#[instrument(skip_all)]
pub async fn configure_status_bar_color(host: &HostServices) -> Result<bool> {
    if !ensure_workspace(host) {
        return Ok(false);
    }

    let preview = StatusBarPreview::capture(host.colors.clone()).await?;
    let Outcome::Committed(color) = pick_status_bar_color(host, &preview).await? else {
        return Ok(false);
    };

    let applied = apply_status_bar_color(
        host,
        &color,
        ApplyColorOptions {
            skip_confirmation: color.trim().is_empty(),
            silent: false,
        },
    )
    .await?;

    if !applied {
        preview.restore().await?;
    }
    Ok(applied)
}

/// Clear the badge settings and the status bar override after confirmation
#[instrument(skip_all)]
pub async fn reset(host: &HostServices) -> Result<bool> {
    if !ensure_workspace(host) {
        return Ok(false);
    }

    if !host.prompts.confirm(RESET_CONFIRMATION, RESET_ACTION).await? {
        info!("Reset declined");
        return Ok(false);
    }

    clear_badge_config(host.settings.as_ref()).await?;

    let current = host.colors.color_customizations().await?;
    let cleared = without_status_bar_color(current.clone());
    if cleared != current {
        host.colors.set_color_customizations(cleared).await?;
    }

    let renderer = BadgeRenderer::new(host.indicator.clone());
    refresh_indicator(host.settings.as_ref(), &renderer).await?;
    host.info(RESET_DONE_MESSAGE);
    Ok(true)
}
