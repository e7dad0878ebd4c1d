// ABOUTME: Terminal implementations of the host services the core workflows run against
// ABOUTME: Settings and colors go to the JSON settings file, prompts and the indicator to the terminal

use async_trait::async_trait;
use statusmark_core::{
    ColorCustomizationStore, ColorCustomizations, ColorSnapshot, HostServices, Result,
    WorkspaceProbe,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::indicator::{StatusBarColors, TerminalIndicator};
use crate::settings_file::JsonSettingsFile;
use crate::terminal::TerminalPrompts;

/// A workspace is open when its folder exists
#[derive(Debug, Clone)]
pub struct DirectoryWorkspace {
    root: PathBuf,
}

impl DirectoryWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl WorkspaceProbe for DirectoryWorkspace {
    fn is_workspace_open(&self) -> bool {
        self.root.is_dir()
    }
}

/// Color store that keeps the indicator's status bar colors in step with every write
struct MirroredColors {
    store: Arc<JsonSettingsFile>,
    indicator: Arc<TerminalIndicator>,
}

#[async_trait]
impl ColorCustomizationStore for MirroredColors {
    async fn color_customizations(&self) -> Result<Option<ColorCustomizations>> {
        self.store.color_customizations().await
    }

    async fn set_color_customizations(&self, value: Option<ColorCustomizations>) -> Result<()> {
        let colors = StatusBarColors::from_map(value.as_ref());
        self.store.set_color_customizations(value).await?;
        self.indicator.set_status_bar(colors);
        Ok(())
    }

    async fn snapshot(&self) -> Result<ColorSnapshot> {
        self.store.snapshot().await
    }

    async fn restore(&self, snapshot: &ColorSnapshot) -> Result<()> {
        self.store.restore(snapshot).await?;
        self.indicator
            .set_status_bar(StatusBarColors::from_map(snapshot.map.as_ref()));
        Ok(())
    }
}

pub struct TerminalHost {
    pub store: Arc<JsonSettingsFile>,
    pub indicator: Arc<TerminalIndicator>,
    pub workspace: Arc<DirectoryWorkspace>,
}

impl TerminalHost {
    pub fn new(workspace: PathBuf, settings_path: PathBuf, default_color: Option<String>) -> Self {
        Self {
            store: Arc::new(JsonSettingsFile::new(settings_path)),
            indicator: Arc::new(TerminalIndicator::new(default_color)),
            workspace: Arc::new(DirectoryWorkspace::new(workspace)),
        }
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            settings: self.store.clone(),
            colors: Arc::new(MirroredColors {
                store: self.store.clone(),
                indicator: self.indicator.clone(),
            }),
            indicator: self.indicator.clone(),
            prompts: Arc::new(TerminalPrompts::with_status_line(self.indicator.clone())),
            workspace: self.workspace.clone(),
        }
    }

    /// Re-read the status bar colors from the settings file
    pub async fn refresh_status_bar(&self) -> Result<()> {
        let map = self.store.color_customizations().await?;
        self.indicator
            .set_status_bar(StatusBarColors::from_map(map.as_ref()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusmark_core::status_bar::StatusBarPreview;
    use statusmark_core::{Preview, StatusIndicator};
    use statusmark_core::testing::color_map;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_probe_follows_directory() {
        let dir = TempDir::new().unwrap();

        assert!(DirectoryWorkspace::new(dir.path()).is_workspace_open());
        assert!(!DirectoryWorkspace::new(dir.path().join("missing")).is_workspace_open());
    }

    #[tokio::test]
    async fn test_color_writes_reach_indicator() {
        let dir = TempDir::new().unwrap();
        let host = TerminalHost::new(
            dir.path().to_path_buf(),
            dir.path().join(".vscode/settings.json"),
            None,
        );
        let services = host.services();

        services
            .colors
            .set_color_customizations(Some(color_map(&[
                ("statusBar.background", "#059669"),
                ("statusBar.foreground", "#ffffff"),
            ])))
            .await
            .unwrap();
        services.indicator.set_text("API");
        services.indicator.show();

        assert!(host.indicator.render_line().contains("48;2;5;150;105"));

        services.colors.set_color_customizations(None).await.unwrap();
        assert!(!host.indicator.render_line().contains("48;2"));
    }

    #[tokio::test]
    async fn test_refresh_status_bar_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r##"{ "workbench.colorCustomizations": { "statusBar.background": "#1E3A8A" } }"##,
        )
        .unwrap();
        let host = TerminalHost::new(dir.path().to_path_buf(), path, None);
        host.indicator.set_text("Docs");
        host.indicator.show();

        host.refresh_status_bar().await.unwrap();

        assert!(host.indicator.render_line().contains("48;2;30;58;138"));
    }

    #[tokio::test]
    async fn test_status_bar_preview_follows_on_indicator_and_rolls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let original = "{\"workbench.colorCustomizations\":{\"statusBar.background\":\"#1E3A8A\"}}";
        std::fs::write(&path, original).unwrap();
        let host = TerminalHost::new(dir.path().to_path_buf(), path.clone(), None);
        host.refresh_status_bar().await.unwrap();
        host.indicator.set_text("Docs");
        host.indicator.show();

        let preview = StatusBarPreview::capture(host.services().colors).await.unwrap();
        preview.preview("#059669").await.unwrap();
        assert!(host.indicator.render_line().contains("48;2;5;150;105"));

        preview.restore().await.unwrap();
        assert!(host.indicator.render_line().contains("48;2;30;58;138"));
        let restored: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            restored["workbench.colorCustomizations"],
            serde_json::json!({ "statusBar.background": "#1E3A8A" })
        );
    }
}
