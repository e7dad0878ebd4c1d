// ABOUTME: In-memory host services for tests of the workflows and of downstream hosts
// ABOUTME: Scripted prompts replay queued events; stores and the indicator record what they saw

use async_trait::async_trait;
use parking_lot::Mutex;
use statusmark_events::SettingsEvent;
use statusmark_types::SettingKey;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::broadcast;

use crate::capabilities::{
    ColorCustomizationStore, ColorCustomizations, HostServices, InputEvent, InputOptions,
    InputSession, MessageLevel, PickerEvent, PickerOptions, PickerSession, PromptHost,
    SettingChange, SettingsStore, StatusIndicator, WorkspaceProbe,
};
use crate::error::{Result, StatusMarkError};

/// Build a color customization map from pairs
pub fn color_map(pairs: &[(&str, &str)]) -> ColorCustomizations {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Settings held in memory, broadcasting a notification for every update
pub struct MemorySettings {
    values: Mutex<BTreeMap<SettingKey, String>>,
    sender: Mutex<Option<broadcast::Sender<SettingsEvent>>>,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl Default for MemorySettings {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            values: Mutex::new(BTreeMap::new()),
            sender: Mutex::new(Some(sender)),
            updates: AtomicUsize::new(0),
            fail_updates: AtomicBool::new(false),
        }
    }
}

impl MemorySettings {
    /// Set a value without notifying, as if it had been there all along
    pub fn insert(&self, key: SettingKey, value: impl Into<String>) {
        self.values.lock().insert(key, value.into());
    }

    pub fn value(&self, key: SettingKey) -> Option<String> {
        self.values.lock().get(&key).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Make every following update fail
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Deliver a notification to subscribers
    pub fn notify(&self, event: SettingsEvent) {
        if let Some(sender) = self.sender.lock().as_ref() {
            let _ = sender.send(event);
        }
    }

    /// Close the notification channel
    pub fn close(&self) {
        self.sender.lock().take();
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, key: SettingKey) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn update(&self, changes: &[SettingChange]) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StatusMarkError::settings_write("settings are read-only"));
        }

        {
            let mut values = self.values.lock();
            for change in changes {
                match &change.value {
                    Some(value) => values.insert(change.key, value.clone()),
                    None => values.remove(&change.key),
                };
            }
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.notify(SettingsEvent::changed(changes.iter().map(|c| c.key)));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.subscribe(),
            // Receiver of a channel whose sender is already gone
            None => broadcast::channel(1).1,
        }
    }
}

/// Color customization map held in memory
#[derive(Default)]
pub struct MemoryColors {
    map: Mutex<Option<ColorCustomizations>>,
    writes: AtomicUsize,
}

impl MemoryColors {
    pub fn with(map: Option<ColorCustomizations>) -> Self {
        Self {
            map: Mutex::new(map),
            writes: AtomicUsize::new(0),
        }
    }

    /// Replace the map without counting a write
    pub fn set(&self, map: Option<ColorCustomizations>) {
        *self.map.lock() = map;
    }

    pub fn current(&self) -> Option<ColorCustomizations> {
        self.map.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ColorCustomizationStore for MemoryColors {
    async fn color_customizations(&self) -> Result<Option<ColorCustomizations>> {
        Ok(self.current())
    }

    async fn set_color_customizations(&self, value: Option<ColorCustomizations>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.map.lock() = value;
        Ok(())
    }
}

/// What a status indicator is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub text: String,
    pub color: Option<String>,
    pub visible: bool,
}

/// Status indicator that keeps its state and a snapshot per show or hide
#[derive(Default)]
pub struct RecordingIndicator {
    state: Mutex<SurfaceState>,
    history: Mutex<Vec<SurfaceState>>,
}

impl RecordingIndicator {
    pub fn state(&self) -> SurfaceState {
        self.state.lock().clone()
    }

    pub fn history(&self) -> Vec<SurfaceState> {
        self.history.lock().clone()
    }

    fn record(&self) {
        let snapshot = self.state();
        self.history.lock().push(snapshot);
    }
}

impl StatusIndicator for RecordingIndicator {
    fn set_text(&self, text: &str) {
        self.state.lock().text = text.to_string();
    }

    fn set_color(&self, color: Option<&str>) {
        self.state.lock().color = color.map(str::to_string);
    }

    fn show(&self) {
        self.state.lock().visible = true;
        self.record();
    }

    fn hide(&self) {
        self.state.lock().visible = false;
        self.record();
    }
}

/// Replays queued events. Once a script runs out the session reports `Hidden`.
struct ScriptedSession<E> {
    events: VecDeque<E>,
    hidden: E,
}

#[async_trait]
impl PickerSession for ScriptedSession<PickerEvent> {
    async fn next_event(&mut self) -> Result<PickerEvent> {
        Ok(self.events.pop_front().unwrap_or_else(|| self.hidden.clone()))
    }
}

#[async_trait]
impl InputSession for ScriptedSession<InputEvent> {
    async fn next_event(&mut self) -> Result<InputEvent> {
        Ok(self.events.pop_front().unwrap_or_else(|| self.hidden.clone()))
    }
}

/// Prompt host driven by queued scripts, one per opened picker, prompt or confirmation
#[derive(Default)]
pub struct ScriptedPrompts {
    pickers: Mutex<VecDeque<Vec<PickerEvent>>>,
    inputs: Mutex<VecDeque<Vec<InputEvent>>>,
    confirms: Mutex<VecDeque<bool>>,
    opened_pickers: Mutex<Vec<PickerOptions>>,
    opened_inputs: Mutex<Vec<InputOptions>>,
    confirmations: Mutex<Vec<(String, String)>>,
    messages: Mutex<Vec<(MessageLevel, String)>>,
}

impl ScriptedPrompts {
    pub fn push_picker(&self, events: impl IntoIterator<Item = PickerEvent>) {
        self.pickers.lock().push_back(events.into_iter().collect());
    }

    pub fn push_input(&self, events: impl IntoIterator<Item = InputEvent>) {
        self.inputs.lock().push_back(events.into_iter().collect());
    }

    pub fn push_confirm(&self, answer: bool) {
        self.confirms.lock().push_back(answer);
    }

    pub fn opened_pickers(&self) -> Vec<PickerOptions> {
        self.opened_pickers.lock().clone()
    }

    pub fn opened_inputs(&self) -> Vec<InputOptions> {
        self.opened_inputs.lock().clone()
    }

    pub fn confirmations(&self) -> Vec<(String, String)> {
        self.confirmations.lock().clone()
    }

    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.lock().clone()
    }

    /// True when every queued script was consumed
    pub fn is_exhausted(&self) -> bool {
        self.pickers.lock().is_empty()
            && self.inputs.lock().is_empty()
            && self.confirms.lock().is_empty()
    }
}

#[async_trait]
impl PromptHost for ScriptedPrompts {
    async fn open_picker(&self, options: PickerOptions) -> Result<Box<dyn PickerSession>> {
        let title = options.title.clone();
        self.opened_pickers.lock().push(options);
        let events = self
            .pickers
            .lock()
            .pop_front()
            .ok_or_else(|| StatusMarkError::prompt(format!("no script for picker '{title}'")))?;
        Ok(Box::new(ScriptedSession {
            events: events.into(),
            hidden: PickerEvent::Hidden,
        }))
    }

    async fn open_input(&self, options: InputOptions) -> Result<Box<dyn InputSession>> {
        let title = options.title.clone();
        self.opened_inputs.lock().push(options);
        let events = self
            .inputs
            .lock()
            .pop_front()
            .ok_or_else(|| StatusMarkError::prompt(format!("no script for input '{title}'")))?;
        Ok(Box::new(ScriptedSession {
            events: events.into(),
            hidden: InputEvent::Hidden,
        }))
    }

    async fn confirm(&self, message: &str, action: &str) -> Result<bool> {
        self.confirmations
            .lock()
            .push((message.to_string(), action.to_string()));
        self.confirms
            .lock()
            .pop_front()
            .ok_or_else(|| StatusMarkError::prompt(format!("no script for confirmation '{action}'")))
    }

    fn show_message(&self, level: MessageLevel, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

/// Workspace probe with a fixed answer
pub struct FixedWorkspace(pub bool);

impl WorkspaceProbe for FixedWorkspace {
    fn is_workspace_open(&self) -> bool {
        self.0
    }
}

/// All fakes wired together, with typed handles for assertions
pub struct TestHost {
    pub settings: Arc<MemorySettings>,
    pub colors: Arc<MemoryColors>,
    pub indicator: Arc<RecordingIndicator>,
    pub prompts: Arc<ScriptedPrompts>,
    pub workspace: Arc<FixedWorkspace>,
}

impl TestHost {
    /// A host with an open workspace and empty stores
    pub fn new() -> Self {
        Self::with_workspace(true)
    }

    pub fn with_workspace(open: bool) -> Self {
        Self {
            settings: Arc::new(MemorySettings::default()),
            colors: Arc::new(MemoryColors::default()),
            indicator: Arc::new(RecordingIndicator::default()),
            prompts: Arc::new(ScriptedPrompts::default()),
            workspace: Arc::new(FixedWorkspace(open)),
        }
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            settings: self.settings.clone(),
            colors: self.colors.clone(),
            indicator: self.indicator.clone(),
            prompts: self.prompts.clone(),
            workspace: self.workspace.clone(),
        }
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}
