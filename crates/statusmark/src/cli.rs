// ABOUTME: Command line surface of the statusmark binary
// ABOUTME: Subcommands map onto the core command identifiers plus show and watch

use clap::{Parser, Subcommand};
use statusmark_events::CommandId;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "statusmark")]
#[command(
    version,
    about = "Workspace badge and status bar colors kept in the workspace settings file"
)]
pub struct Cli {
    /// Workspace folder (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Settings file, relative to the workspace unless absolute.
    ///
    /// Comments and trailing commas are accepted on read. Files are written
    /// back as plain JSON, so they are not kept once StatusMark changes the file.
    #[arg(long, global = true)]
    pub settings_file: Option<PathBuf>,

    /// Log level directives, e.g. `debug` or `info,statusmark_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick the badge name, emoji, badge color and status bar color
    Configure,
    /// Pick the status bar color only
    StatusBarColor,
    /// Remove the badge settings and status bar color overrides
    Reset,
    /// Print the current badge line
    Show,
    /// Keep the badge line on screen, updating it when the settings file changes
    Watch,
    /// Run a command by its identifier, e.g. statusmark.configure
    Run {
        #[arg(value_parser = parse_command_id)]
        command: CommandId,
    },
}

fn parse_command_id(raw: &str) -> Result<CommandId, String> {
    raw.parse::<CommandId>().map_err(|e| e.to_string())
}

impl Command {
    /// The core command this subcommand runs, if any
    pub fn command_id(&self) -> Option<CommandId> {
        match self {
            Command::Configure => Some(CommandId::Configure),
            Command::StatusBarColor => Some(CommandId::ConfigureStatusBarColor),
            Command::Reset => Some(CommandId::Reset),
            Command::Run { command } => Some(*command),
            Command::Show | Command::Watch => None,
        }
    }
}

impl Cli {
    pub fn workspace_dir(&self) -> PathBuf {
        self.workspace
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The settings file to use, `configured` being the config file's relative default
    pub fn settings_path(&self, workspace: &Path, configured: &Path) -> PathBuf {
        let relative = self.settings_file.as_deref().unwrap_or(configured);
        workspace.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommands_map_to_commands() {
        let cli = Cli::try_parse_from(["statusmark", "configure"]).unwrap();
        assert_eq!(cli.command.command_id(), Some(CommandId::Configure));

        let cli = Cli::try_parse_from(["statusmark", "status-bar-color"]).unwrap();
        assert_eq!(
            cli.command.command_id(),
            Some(CommandId::ConfigureStatusBarColor)
        );

        let cli = Cli::try_parse_from(["statusmark", "show"]).unwrap();
        assert_eq!(cli.command.command_id(), None);
    }

    #[test]
    fn test_run_parses_command_identifier() {
        let cli = Cli::try_parse_from(["statusmark", "run", "statusmark.reset"]).unwrap();
        assert_eq!(cli.command.command_id(), Some(CommandId::Reset));

        assert!(Cli::try_parse_from(["statusmark", "run", "statusmark.unknown"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "statusmark",
            "watch",
            "-w",
            "/tmp/project",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Watch);
        assert_eq!(cli.workspace_dir(), PathBuf::from("/tmp/project"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_settings_path_resolution() {
        let workspace = Path::new("/ws");
        let configured = Path::new(".vscode/settings.json");

        let cli = Cli::try_parse_from(["statusmark", "show"]).unwrap();
        assert_eq!(
            cli.settings_path(workspace, configured),
            PathBuf::from("/ws/.vscode/settings.json")
        );

        let cli =
            Cli::try_parse_from(["statusmark", "show", "--settings-file", "/etc/s.json"]).unwrap();
        assert_eq!(
            cli.settings_path(workspace, configured),
            PathBuf::from("/etc/s.json")
        );
    }
}
