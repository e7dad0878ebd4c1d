// ABOUTME: Raw-mode terminal widgets implementing the prompt host
// ABOUTME: List picker, single-line input, yes/no confirmation and leveled messages on stderr

use async_trait::async_trait;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{QueueableCommand, queue};
use futures::StreamExt;
use statusmark_core::{
    InputEvent, InputOptions, InputSession, MessageLevel, PickerEvent, PickerItem, PickerOptions,
    PickerSession, PromptHost, Result,
};
use statusmark_logging::{debug, warn};
use std::io::{self, Write};
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

use crate::indicator::TerminalIndicator;

/// Raw mode for as long as the guard lives
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to leave raw mode");
        }
    }
}

/// Lines drawn on stderr by the current widget, so they can be redrawn in place.
///
/// The status line, when there is one, is drawn as the last row so previews
/// show up while the widget owns the terminal.
#[derive(Default)]
struct Frame {
    lines: u16,
    status_line: Option<Arc<TerminalIndicator>>,
}

impl Frame {
    fn new(status_line: Option<Arc<TerminalIndicator>>) -> Self {
        Self {
            lines: 0,
            status_line,
        }
    }

    /// Widget rows followed by the status line as it is right now
    fn compose(&self, body: &[String]) -> Vec<String> {
        let mut lines = body.to_vec();
        let status = self
            .status_line
            .as_ref()
            .map(|indicator| indicator.render_line())
            .unwrap_or_default();
        if !status.is_empty() {
            lines.push(String::new());
            lines.push(status);
        }
        lines
    }

    fn draw(&mut self, body: &[String]) -> io::Result<()> {
        let lines = self.compose(body);
        let mut out = io::stderr().lock();
        self.clear_into(&mut out)?;
        for line in &lines {
            write!(out, "{line}\r\n")?;
        }
        self.lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        let mut out = io::stderr().lock();
        self.clear_into(&mut out)?;
        out.flush()
    }

    fn clear_into(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.lines > 0 {
            queue!(out, MoveUp(self.lines), MoveToColumn(0))?;
        }
        out.queue(Clear(ClearType::FromCursorDown))?;
        self.lines = 0;
        Ok(())
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'd'))
}

/// Next key press, or `None` when the terminal stops delivering events
async fn next_key(events: &mut EventStream) -> io::Result<Option<KeyEvent>> {
    while let Some(event) = events.next().await {
        if let Event::Key(key) = event? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

/// Picker rows: active marker, picked marker, aligned labels and dimmed descriptions
fn picker_lines(options: &PickerOptions, active: Option<usize>) -> Vec<String> {
    let label_width = options
        .items
        .iter()
        .map(|item| item.label.width())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        options.title.clone().bold().to_string(),
        options.placeholder.clone().dim().to_string(),
    ];
    lines.extend(options.items.iter().enumerate().map(|(index, item)| {
        picker_row(item, label_width, active == Some(index))
    }));
    lines.push("↑/↓ move · Enter select · Esc cancel".dim().to_string());
    lines
}

fn picker_row(item: &PickerItem, label_width: usize, active: bool) -> String {
    let pointer = if active { "›" } else { " " };
    let marker = if item.picked { "●" } else { " " };
    let style = |label: String| {
        if active {
            label.cyan().bold().to_string()
        } else {
            label
        }
    };

    match &item.description {
        Some(description) => {
            let padding = " ".repeat(label_width.saturating_sub(item.label.width()));
            let label = style(format!("{}{padding}", item.label));
            format!("{pointer} {marker} {label}  {}", description.as_str().dim())
        }
        None => format!("{pointer} {marker} {}", style(item.label.clone())),
    }
}

fn input_lines(options: &InputOptions, value: &str) -> Vec<String> {
    let shown = if value.is_empty() {
        options
            .placeholder
            .as_deref()
            .unwrap_or_default()
            .dim()
            .to_string()
    } else {
        value.to_string()
    };

    vec![
        options.title.clone().bold().to_string(),
        options.prompt.clone().dim().to_string(),
        format!("{} {shown}", "›".cyan()),
    ]
}

struct TerminalPicker {
    options: PickerOptions,
    active: Option<usize>,
    events: EventStream,
    frame: Frame,
    _raw: RawMode,
}

impl TerminalPicker {
    fn redraw(&mut self) -> io::Result<()> {
        self.frame.draw(&picker_lines(&self.options, self.active))
    }

    fn move_to(&mut self, index: usize) -> Result<Option<PickerEvent>> {
        if self.active == Some(index) {
            return Ok(None);
        }
        self.active = Some(index);
        self.redraw()?;
        Ok(Some(PickerEvent::ActiveChanged(self.active)))
    }
}

#[async_trait]
impl PickerSession for TerminalPicker {
    async fn next_event(&mut self) -> Result<PickerEvent> {
        let last = self.options.items.len().saturating_sub(1);
        // Pick up the preview of the previous event
        self.redraw()?;
        loop {
            let Some(key) = next_key(&mut self.events).await? else {
                self.frame.clear()?;
                return Ok(PickerEvent::Hidden);
            };

            if is_interrupt(&key) {
                self.frame.clear()?;
                return Ok(PickerEvent::Hidden);
            }

            let target = match key.code {
                KeyCode::Up | KeyCode::BackTab => {
                    Some(self.active.map_or(last, |i| i.saturating_sub(1)))
                }
                KeyCode::Down | KeyCode::Tab => Some(self.active.map_or(0, |i| (i + 1).min(last))),
                KeyCode::Home | KeyCode::PageUp => Some(0),
                KeyCode::End | KeyCode::PageDown => Some(last),
                KeyCode::Enter => {
                    self.frame.clear()?;
                    return Ok(PickerEvent::Accepted(self.active));
                }
                KeyCode::Esc => {
                    self.frame.clear()?;
                    return Ok(PickerEvent::Hidden);
                }
                _ => None,
            };

            if self.options.items.is_empty() {
                continue;
            }
            if let Some(index) = target {
                if let Some(event) = self.move_to(index)? {
                    return Ok(event);
                }
            }
        }
    }
}

struct TerminalInput {
    options: InputOptions,
    value: String,
    events: EventStream,
    frame: Frame,
    _raw: RawMode,
}

impl TerminalInput {
    fn redraw(&mut self) -> io::Result<()> {
        self.frame.draw(&input_lines(&self.options, &self.value))
    }

    fn changed(&mut self) -> Result<InputEvent> {
        self.redraw()?;
        Ok(InputEvent::Changed(self.value.clone()))
    }
}

#[async_trait]
impl InputSession for TerminalInput {
    async fn next_event(&mut self) -> Result<InputEvent> {
        self.redraw()?;
        loop {
            let Some(key) = next_key(&mut self.events).await? else {
                self.frame.clear()?;
                return Ok(InputEvent::Hidden);
            };

            if is_interrupt(&key) {
                self.frame.clear()?;
                return Ok(InputEvent::Hidden);
            }

            match key.code {
                KeyCode::Enter => {
                    self.frame.clear()?;
                    return Ok(InputEvent::Accepted(self.value.clone()));
                }
                KeyCode::Esc => {
                    self.frame.clear()?;
                    return Ok(InputEvent::Hidden);
                }
                KeyCode::Backspace => {
                    if self.value.pop().is_some() {
                        return self.changed();
                    }
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if !self.value.is_empty() {
                        self.value.clear();
                        return self.changed();
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.value.push(c);
                    return self.changed();
                }
                _ => {}
            }
        }
    }
}

/// Prompt host drawing on stderr and reading keys from the controlling terminal
#[derive(Default)]
pub struct TerminalPrompts {
    status_line: Option<Arc<TerminalIndicator>>,
}

impl TerminalPrompts {
    /// Prompts that show `indicator` below every widget
    pub fn with_status_line(indicator: Arc<TerminalIndicator>) -> Self {
        Self {
            status_line: Some(indicator),
        }
    }

    fn frame(&self) -> Frame {
        Frame::new(self.status_line.clone())
    }
}

#[async_trait]
impl PromptHost for TerminalPrompts {
    async fn open_picker(&self, options: PickerOptions) -> Result<Box<dyn PickerSession>> {
        debug!(title = %options.title, items = options.items.len(), "Opening terminal picker");
        let raw = RawMode::enable()?;
        let mut frame = self.frame();
        frame.draw(&picker_lines(&options, options.active))?;

        Ok(Box::new(TerminalPicker {
            active: options.active,
            options,
            events: EventStream::new(),
            frame,
            _raw: raw,
        }))
    }

    async fn open_input(&self, options: InputOptions) -> Result<Box<dyn InputSession>> {
        debug!(title = %options.title, "Opening terminal input");
        let raw = RawMode::enable()?;
        let mut frame = self.frame();
        frame.draw(&input_lines(&options, &options.value))?;

        Ok(Box::new(TerminalInput {
            value: options.value.clone(),
            options,
            events: EventStream::new(),
            frame,
            _raw: raw,
        }))
    }

    async fn confirm(&self, message: &str, action: &str) -> Result<bool> {
        let _raw = RawMode::enable()?;
        let mut frame = self.frame();
        frame.draw(&[
            message.bold().to_string(),
            format!("{} {action}   {} Cancel", "[y]".cyan(), "[n]".cyan()),
        ])?;

        let mut events = EventStream::new();
        let confirmed = loop {
            let Some(key) = next_key(&mut events).await? else {
                break false;
            };
            if is_interrupt(&key) {
                break false;
            }
            match key.code {
                KeyCode::Char('y' | 'Y') => break true,
                KeyCode::Char('n' | 'N') | KeyCode::Esc => break false,
                _ => {}
            }
        };

        frame.clear()?;
        Ok(confirmed)
    }

    fn show_message(&self, level: MessageLevel, message: &str) {
        let prefix = match level {
            MessageLevel::Info => "info:".blue().bold(),
            MessageLevel::Warning => "warning:".yellow().bold(),
            MessageLevel::Error => "error:".red().bold(),
        };
        // Raw mode may still be on, so end the line explicitly
        let mut out = io::stderr().lock();
        if let Err(e) = write!(out, "{prefix} {message}\r\n").and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write message to terminal");
        }
    }
}
