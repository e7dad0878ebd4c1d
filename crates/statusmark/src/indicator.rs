// ABOUTME: Terminal status line standing in for the editor's status bar item
// ABOUTME: Draws the badge in its color on top of the workspace's status bar override colors

use crossterm::style::{Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use parking_lot::Mutex;
use statusmark_core::{ColorCustomizations, StatusIndicator, parse_hex_color};
use statusmark_logging::warn;
use statusmark_types::StatusBarKey;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Text, color and visibility set by the badge renderer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorState {
    pub text: String,
    pub color: Option<String>,
    pub visible: bool,
}

/// Background and foreground of the status bar override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarColors {
    pub background: Option<String>,
    pub foreground: Option<String>,
}

impl StatusBarColors {
    pub fn from_map(map: Option<&ColorCustomizations>) -> Self {
        let get = |key: StatusBarKey| map.and_then(|m| m.get(key.as_str())).cloned();
        Self {
            background: get(StatusBarKey::Background),
            foreground: get(StatusBarKey::Foreground),
        }
    }
}

fn terminal_color(hex: Option<&str>) -> Option<Color> {
    let rgb = parse_hex_color(hex?)?;
    Some(Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    })
}

pub struct TerminalIndicator {
    state: Mutex<IndicatorState>,
    bar: Mutex<StatusBarColors>,
    /// Badge color when the badge has none of its own
    default_color: Option<String>,
    /// Redraw the line on stderr whenever the badge is shown or hidden.
    /// Off while prompts are open; they draw the line inside their own frame.
    live: AtomicBool,
}

impl TerminalIndicator {
    pub fn new(default_color: Option<String>) -> Self {
        Self {
            state: Mutex::new(IndicatorState::default()),
            bar: Mutex::new(StatusBarColors::default()),
            default_color,
            live: AtomicBool::new(false),
        }
    }

    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
    }

    pub fn state(&self) -> IndicatorState {
        self.state.lock().clone()
    }

    pub fn set_status_bar(&self, colors: StatusBarColors) {
        *self.bar.lock() = colors;
    }

    /// The status line with ANSI styling, or an empty string while hidden
    pub fn render_line(&self) -> String {
        let state = self.state();
        if !state.visible {
            return String::new();
        }

        let bar = self.bar.lock().clone();
        let foreground = state
            .color
            .as_deref()
            .or(self.default_color.as_deref())
            .or(bar.foreground.as_deref());

        let mut styled = format!(" {} ", state.text).stylize();
        if let Some(color) = terminal_color(foreground) {
            styled = styled.with(color);
        }
        if let Some(color) = terminal_color(bar.background.as_deref()) {
            styled = styled.on(color);
        }
        styled.to_string()
    }

    /// Redraw the status line in place on stderr
    pub fn redraw(&self) {
        let line = self.render_line();
        let mut out = io::stderr().lock();
        let result = out
            .write_all(b"\r")
            .and_then(|_| out.queue(Clear(ClearType::CurrentLine)).map(|_| ()))
            .and_then(|_| out.write_all(line.as_bytes()))
            .and_then(|_| out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to draw status line");
        }
    }

    fn changed(&self) {
        if self.live.load(Ordering::SeqCst) {
            self.redraw();
        }
    }
}

impl StatusIndicator for TerminalIndicator {
    fn set_text(&self, text: &str) {
        self.state.lock().text = text.to_string();
    }

    fn set_color(&self, color: Option<&str>) {
        self.state.lock().color = color.map(str::to_string);
    }

    fn show(&self) {
        self.state.lock().visible = true;
        self.changed();
    }

    fn hide(&self) {
        self.state.lock().visible = false;
        self.changed();
    }
}
