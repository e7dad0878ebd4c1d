// ABOUTME: Renders the workspace badge onto the host's status indicator
// ABOUTME: Used for persisted configs and for live previews during the workflows

use statusmark_types::BadgeConfig;
use std::sync::Arc;

use crate::capabilities::StatusIndicator;

/// Text and color a badge resolves to, or nothing when it would be empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub text: String,
    /// `None` means the indicator's default color
    pub color: Option<String>,
}

impl BadgeView {
    pub fn compute(emoji: &str, name: &str, color: &str) -> Option<Self> {
        let text = format!("{emoji} {name}").trim().to_string();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text,
            color: (!color.is_empty()).then(|| color.to_string()),
        })
    }
}

#[derive(Clone)]
pub struct BadgeRenderer {
    surface: Arc<dyn StatusIndicator>,
}

impl BadgeRenderer {
    pub fn new(surface: Arc<dyn StatusIndicator>) -> Self {
        Self { surface }
    }

    /// Show `emoji name` in `color`, or hide the indicator when both are blank
    pub fn render(&self, emoji: &str, name: &str, color: &str) {
        match BadgeView::compute(emoji, name, color) {
            Some(view) => {
                self.surface.set_text(&view.text);
                self.surface.set_color(view.color.as_deref());
                self.surface.show();
            }
            None => {
                self.surface.set_text("");
                self.surface.hide();
            }
        }
    }

    pub fn refresh(&self, config: &BadgeConfig) {
        self.render(&config.emoji, &config.name, &config.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingIndicator;

    #[test]
    fn test_render_visible_badge() {
        let indicator = Arc::new(RecordingIndicator::default());
        let renderer = BadgeRenderer::new(indicator.clone());

        renderer.render("🚀", "Proj", "#0EA5E9");

        let state = indicator.state();
        assert_eq!(state.text, "🚀 Proj");
        assert_eq!(state.color.as_deref(), Some("#0EA5E9"));
        assert!(state.visible);
    }

    #[test]
    fn test_empty_color_uses_default() {
        let indicator = Arc::new(RecordingIndicator::default());
        let renderer = BadgeRenderer::new(indicator.clone());

        renderer.render("", "Proj", "#0EA5E9");
        renderer.render("", "Proj", "");

        let state = indicator.state();
        assert_eq!(state.text, "Proj");
        assert_eq!(state.color, None);
        assert!(state.visible);
    }

    #[test]
    fn test_blank_badge_hides_indicator() {
        let indicator = Arc::new(RecordingIndicator::default());
        let renderer = BadgeRenderer::new(indicator.clone());

        renderer.render("🔥", "API", "#EF4444");
        renderer.render(" ", "  ", "#EF4444");

        let state = indicator.state();
        assert_eq!(state.text, "");
        assert!(!state.visible);
    }

    #[test]
    fn test_render_is_idempotent() {
        let indicator = Arc::new(RecordingIndicator::default());
        let renderer = BadgeRenderer::new(indicator.clone());

        renderer.render("🧪", "Branch", "#14B8A6");
        let first = indicator.state();
        renderer.render("🧪", "Branch", "#14B8A6");
        assert_eq!(indicator.state(), first);
    }

    #[test]
    fn test_badge_view_compute() {
        assert_eq!(BadgeView::compute("", "", "#FFFFFF"), None);
        assert_eq!(
            BadgeView::compute("🎯", "", ""),
            Some(BadgeView {
                text: "🎯".to_string(),
                color: None,
            })
        );
    }
}
