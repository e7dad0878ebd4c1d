// ABOUTME: Entry point of the statusmark binary
// ABOUTME: Sets up logging, activates StatusMark against the workspace and runs one subcommand

use std::panic;

use anyhow::{Context, Result};
use clap::Parser;
use statusmark::config::{AppConfig, config_dir};
use statusmark::file_watch::SettingsFileWatcher;
use statusmark::{Cli, Command, TerminalHost};
use statusmark_core::StatusMark;
use statusmark_logging::{LoggingConfig, LoggingGuard, error, info, init_logging, instrument, warn};

fn setup_logging(cli: &Cli, config: &AppConfig) -> Result<LoggingGuard> {
    let mut logging = LoggingConfig::default();
    config.apply_logging(&mut logging);
    logging
        .apply_env_overrides()
        .context("Failed to apply logging environment overrides")?;

    if let Some(level) = cli.log_level.as_deref() {
        logging
            .apply_directives(level)
            .context("Invalid --log-level")?;
    }

    let guard = init_logging(&logging).context("Failed to initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "StatusMark logging initialized");
    Ok(guard)
}

#[instrument]
fn install_panic_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        // Leave raw mode so the message is readable
        let _ = crossterm::terminal::disable_raw_mode();

        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        let payload = info.payload();
        let panic_message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        error!(
            panic_message = %panic_message,
            location = ?location,
            thread = ?std::thread::current().name(),
            "Application panic occurred"
        );
        default_hook(info);
    }));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Sanitizing logs warnings, so it waits for the subscriber
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let _guard = setup_logging(&cli, &config)?;
    if let Some(e) = config_error {
        warn!(
            config_dir = %config_dir().display(),
            error = %e,
            "Failed to load configuration, using defaults"
        );
    }
    let config = config.sanitized();

    install_panic_handler();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let workspace = cli.workspace_dir();
    let settings_path = cli.settings_path(&workspace, &config.settings_file);
    info!(
        workspace = %workspace.display(),
        settings = %settings_path.display(),
        command = ?cli.command,
        "Starting"
    );

    let host = TerminalHost::new(
        workspace,
        settings_path,
        config.indicator.default_color.clone(),
    );
    host.refresh_status_bar()
        .await
        .context("Failed to read status bar colors")?;
    let app = StatusMark::activate(host.services())
        .await
        .context("Failed to activate StatusMark")?;

    match cli.command {
        Command::Show => print_badge(&host),
        Command::Watch => watch(&host).await?,
        command => {
            if let Some(id) = command.command_id() {
                app.execute(id)
                    .await
                    .with_context(|| format!("{} failed", id.title()))?;
                print_badge(&host);
            }
        }
    }
    Ok(())
}

/// Print the badge line to stdout; nothing when the badge is hidden
fn print_badge(host: &TerminalHost) {
    let line = host.indicator.render_line();
    if !line.is_empty() {
        println!("{line}");
    }
}

/// Redraw the badge line whenever the settings file changes, until Ctrl-C
async fn watch(host: &TerminalHost) -> Result<()> {
    let mut watcher = SettingsFileWatcher::new(host.store.path().to_path_buf())?;
    host.indicator.set_live(true);
    host.indicator.redraw();

    loop {
        tokio::select! {
            change = watcher.next_change() => {
                if change.is_none() {
                    warn!("Settings file watcher stopped");
                    break;
                }
                if let Err(e) = host.refresh_status_bar().await {
                    warn!(error = %e, "Failed to read status bar colors");
                }
                // The indicator watcher re-renders, and redraws, on the reload event
                host.store.reload();
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    host.indicator.set_live(false);
    eprintln!();
    Ok(())
}
