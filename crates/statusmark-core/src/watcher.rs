// ABOUTME: Keeps the status indicator in sync with settings edited outside a workflow
// ABOUTME: Listens to settings notifications and re-renders when a badge key changed

use statusmark_events::SettingsEvent;
use statusmark_logging::{debug, error, warn};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::badge::BadgeRenderer;
use crate::capabilities::SettingsStore;
use crate::workflow::refresh_indicator;

/// Watches settings notifications for one indicator
pub struct IndicatorWatcher {
    settings: Arc<dyn SettingsStore>,
    renderer: BadgeRenderer,
    events: broadcast::Receiver<SettingsEvent>,
}

impl IndicatorWatcher {
    /// Subscribe now so that no notification sent after this call is missed
    pub fn new(settings: Arc<dyn SettingsStore>, renderer: BadgeRenderer) -> Self {
        let events = settings.subscribe();
        Self {
            settings,
            renderer,
            events,
        }
    }

    /// Run until the notification channel closes
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) if event.affects_badge() => {
                    debug!(?event, "Badge settings changed");
                    self.refresh().await;
                }
                Ok(event) => {
                    debug!(?event, "Ignoring unrelated settings change");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Settings notifications lagged, refreshing indicator");
                    self.refresh().await;
                }
                Err(RecvError::Closed) => {
                    debug!("Settings notification channel closed");
                    break;
                }
            }
        }
    }

    /// Spawn [`Self::run`] on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn refresh(&self) {
        if let Err(e) = refresh_indicator(self.settings.as_ref(), &self.renderer).await {
            error!(error = %e, "Failed to refresh indicator from settings");
        }
    }
}
