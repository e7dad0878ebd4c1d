// ABOUTME: Activation entry point tying the host services, indicator watcher and commands together
// ABOUTME: One StatusMark instance lives for as long as the host keeps the workspace open

use statusmark_events::CommandId;
use statusmark_logging::{error, info};
use statusmark_types::BadgeConfig;
use tokio::task::JoinHandle;

use crate::badge::BadgeRenderer;
use crate::capabilities::HostServices;
use crate::error::Result;
use crate::watcher::IndicatorWatcher;
use crate::workflow;

/// An activated StatusMark instance
pub struct StatusMark {
    host: HostServices,
    renderer: BadgeRenderer,
    watcher: JoinHandle<()>,
}

impl StatusMark {
    /// Render the indicator from persisted settings and start watching for changes.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn activate(host: HostServices) -> Result<Self> {
        let renderer = BadgeRenderer::new(host.indicator.clone());
        let watcher = IndicatorWatcher::new(host.settings.clone(), renderer.clone()).spawn();

        let config = workflow::refresh_indicator(host.settings.as_ref(), &renderer).await?;
        info!(text = %config.display_text(), "StatusMark activated");

        Ok(Self {
            host,
            renderer,
            watcher,
        })
    }

    /// Run a command to completion. Store failures are logged and returned.
    pub async fn execute(&self, command: CommandId) -> Result<()> {
        info!(command = %command, "Executing command");
        let result = match command {
            CommandId::Configure => workflow::configure_badge(&self.host).await.map(drop),
            CommandId::ConfigureStatusBarColor => {
                workflow::configure_status_bar_color(&self.host).await.map(drop)
            }
            CommandId::Reset => workflow::reset(&self.host).await.map(drop),
        };

        if let Err(e) = &result {
            error!(command = %command, error = %e, "Command failed");
        }
        result
    }

    /// Re-render the indicator from persisted settings
    pub async fn refresh_indicator(&self) -> Result<BadgeConfig> {
        workflow::refresh_indicator(self.host.settings.as_ref(), &self.renderer).await
    }
}

impl Drop for StatusMark {
    // Stops the watcher; the indicator keeps its last state
    fn drop(&mut self) {
        self.watcher.abort();
    }
}
