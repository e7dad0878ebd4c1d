// ABOUTME: Watches the workspace settings file with notify for edits made outside StatusMark
// ABOUTME: Bursts of events from one save are coalesced into a single change notification

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use statusmark_logging::{debug, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// How long to keep absorbing events after the first one of a burst
const SETTLE_DELAY: Duration = Duration::from_millis(100);

pub struct SettingsFileWatcher {
    _watcher: notify::RecommendedWatcher,
    event_receiver: mpsc::UnboundedReceiver<notify::Result<Event>>,
    path: PathBuf,
    file_name: OsString,
}

impl SettingsFileWatcher {
    /// Watch `path`. The parent directory is watched rather than the file so that
    /// atomic replaces and a file created later are both seen; it is created if missing.
    pub fn new(path: PathBuf) -> Result<Self> {
        let file_name = path
            .file_name()
            .with_context(|| format!("Settings path has no file name: {}", path.display()))?
            .to_os_string();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            // Receiver dropped means the watcher is going away
            let _ = tx.send(res);
        })?;
        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", parent.display()))?;

        debug!(path = %path.display(), "Watching settings file");
        Ok(Self {
            _watcher: watcher,
            event_receiver: rx,
            path,
            file_name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the settings file to change. `None` once the watcher has shut down.
    pub async fn next_change(&mut self) -> Option<()> {
        loop {
            let event = self.event_receiver.recv().await?;
            if self.accept(event) {
                break;
            }
        }

        // Swallow the rest of the burst
        let deadline = tokio::time::sleep(SETTLE_DELAY);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = self.event_receiver.recv() => match event {
                    Some(_) => continue,
                    None => break,
                },
            }
        }
        Some(())
    }

    fn accept(&self, event: notify::Result<Event>) -> bool {
        match event {
            Ok(event) => is_relevant(&event, &self.file_name),
            Err(e) => {
                warn!(error = %e, "Settings file watcher error");
                false
            }
        }
    }
}

/// Whether `event` touches the watched file in a way that may change its content
fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    let content_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    content_kind
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}
