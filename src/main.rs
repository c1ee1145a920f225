mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod panel;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig, OpenConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// A terminal file browser with a live tree and a preview/info side panel.
#[derive(Parser, Debug)]
#[command(name = "tfm", version, about)]
struct Cli {
    /// Root directory to browse (defaults to the configured path, then ".")
    path: Option<PathBuf>,

    /// Config file to load on top of the discovered ones
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Command used by the open action; PATH is replaced by the selection
    #[arg(long, value_name = "TEMPLATE")]
    open_cmd: Option<String>,

    /// Show dot-files
    #[arg(long)]
    show_hidden: bool,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// CLI flags as a partial config layered over every file source.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.show_hidden.then_some(true),
                ..Default::default()
            },
            open: OpenConfig {
                command: self.open_cmd.clone(),
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Suspend the UI and run the open command for `app.pending_open`.
fn run_pending_open(app: &mut App, tui: &mut Tui, events: &EventHandler) -> error::Result<()> {
    let Some(path) = app.pending_open.take() else {
        return Ok(());
    };
    events.pause();
    tui.suspend()?;
    let status = fs::shell::open_with(&app.open_command, &path);
    tui.resume()?;
    events.resume();
    app.finish_open(&path, status);
    Ok(())
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    if let Some(log_file) = config.log_file() {
        logging::init_global(&log_file, config.log_level());
    }

    let requested = cli
        .path
        .clone()
        .or_else(|| config.default_path().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = requested.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;

    let mut app = App::new(&path, &config)?;

    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        run_pending_open(&mut app, &mut tui, &events)?;

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("session ended");
    Ok(())
}
