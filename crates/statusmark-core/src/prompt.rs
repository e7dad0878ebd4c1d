// ABOUTME: Free-text prompts for custom colors, custom emoji and the project name
// ABOUTME: Hex colors are validated in a re-prompt loop; the name previews on every keystroke

use statusmark_logging::debug;
use statusmark_types::{BadgeConfig, Outcome};

use crate::badge::BadgeRenderer;
use crate::capabilities::{InputEvent, InputOptions, InputSession, MessageLevel, PromptHost};
use crate::color::{normalize_hex_color, parse_hex_color};
use crate::error::Result;
use crate::picker::Settlement;

pub const EMPTY_COLOR_MESSAGE: &str = "Color cannot be empty. Please enter a value.";
pub const INVALID_COLOR_MESSAGE: &str =
    "The provided color is not a valid hexadecimal value (#RRGGBB).";
pub const EMPTY_NAME_MESSAGE: &str = "Project name cannot be empty.";

const COLOR_PLACEHOLDER: &str = "#0A3F80";

/// Wait for the prompt to be accepted, ignoring keystrokes. `None` when dismissed.
async fn wait_for_submission(session: &mut dyn InputSession) -> Result<Option<String>> {
    loop {
        match session.next_event().await? {
            InputEvent::Changed(_) => continue,
            InputEvent::Accepted(value) => return Ok(Some(value)),
            InputEvent::Hidden => return Ok(None),
        }
    }
}

/// Ask for a `#RRGGBB` color until a valid one is entered or the prompt is dismissed.
///
/// Every attempt is seeded with `seed`. The committed value is normalized to
/// carry a leading `#`.
pub async fn prompt_hex_color(
    prompts: &dyn PromptHost,
    title: &str,
    prompt: &str,
    seed: &str,
) -> Result<Outcome<String>> {
    loop {
        let mut session = prompts
            .open_input(InputOptions {
                title: title.to_string(),
                prompt: prompt.to_string(),
                value: seed.to_string(),
                placeholder: Some(COLOR_PLACEHOLDER.to_string()),
            })
            .await?;

        let Some(submitted) = wait_for_submission(session.as_mut()).await? else {
            return Ok(Outcome::Cancelled);
        };

        let trimmed = submitted.trim();
        if trimmed.is_empty() {
            prompts.show_message(MessageLevel::Error, EMPTY_COLOR_MESSAGE);
            continue;
        }

        if parse_hex_color(trimmed).is_none() {
            debug!(input = trimmed, "Rejected custom color");
            prompts.show_message(MessageLevel::Error, INVALID_COLOR_MESSAGE);
            continue;
        }

        return Ok(Outcome::Committed(normalize_hex_color(trimmed)));
    }
}

/// Ask for any emoji text. An empty submission means "no emoji".
pub async fn prompt_custom_emoji(
    prompts: &dyn PromptHost,
    title: &str,
    prompt: &str,
    seed: &str,
) -> Result<Outcome<String>> {
    let mut session = prompts
        .open_input(InputOptions {
            title: title.to_string(),
            prompt: prompt.to_string(),
            value: seed.to_string(),
            placeholder: None,
        })
        .await?;

    Ok(wait_for_submission(session.as_mut()).await?.into())
}

/// Ask for the project name while previewing it on the badge.
///
/// `current` holds the badge as it is before the prompt; it is rendered
/// again whenever the prompt does not commit.
pub async fn prompt_project_name(
    prompts: &dyn PromptHost,
    renderer: &BadgeRenderer,
    current: &BadgeConfig,
) -> Result<Outcome<String>> {
    let restore = || renderer.refresh(current);

    let mut session = prompts
        .open_input(InputOptions {
            title: "Project Name".to_string(),
            prompt: "Enter the name you want to display in the status bar.".to_string(),
            value: current.name.clone(),
            placeholder: None,
        })
        .await?;

    renderer.refresh(current);

    let mut settlement = Settlement::default();
    while !settlement.is_settled() {
        match session.next_event().await? {
            InputEvent::Changed(value) => {
                renderer.render(&current.emoji, &value, &current.color);
            }
            InputEvent::Accepted(value) => {
                let value = value.trim();
                if value.is_empty() {
                    prompts.show_message(MessageLevel::Error, EMPTY_NAME_MESSAGE);
                    restore();
                    settlement.settle(Outcome::Cancelled);
                } else {
                    settlement.settle(Outcome::Committed(value.to_string()));
                }
            }
            InputEvent::Hidden => {
                restore();
                settlement.settle(Outcome::Cancelled);
            }
        }
    }

    Ok(settlement.into_outcome().unwrap_or(Outcome::Cancelled))
}
