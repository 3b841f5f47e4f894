//! gesture-panel
//!
//! Operator console for a live gesture-recognition server. Tunes detection
//! settings, saves snapshots of the displayed frame and mirrors the
//! recognition status, all over the server's HTTP endpoints.

mod api;
mod config;
mod console;
mod feed;
mod frame;
mod logging;
mod settings;
mod snapshot;
mod status;
mod ui;

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use api::HttpControlApi;
use config::Config;
use console::{Command, Usage};
use feed::{FeedViewer, VIDEO_FEED_PATH};
use frame::FrameSlot;
use settings::SettingsSynchronizer;
use snapshot::SnapshotRequester;
use status::StatusPoller;
use ui::{ControlSurface, TerminalSurface};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config_path = arg_value(&args, "--config").map(PathBuf::from);
    let server_override = arg_value(&args, "--server");

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = logging::init_logging()?;

    info!("gesture-panel starting...");

    let mut config = Config::load(config_path.as_deref())?;
    config.apply_server_override(server_override);
    info!(
        "Configuration loaded from {:?}, server {}",
        config.config_path().ok(),
        config.server.base_url
    );

    // All handlers share one thread; none of them ever run concurrently
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run(config))?;

    info!("Shutdown complete");
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let api = Arc::new(HttpControlApi::new(&config.server)?);
    let terminal = Arc::new(TerminalSurface::stdout());
    let surface: Arc<dyn ControlSurface> = terminal.clone();
    let frames = FrameSlot::new();

    terminal.print(&format!("Connected to {}", config.server.base_url));

    let mut settings = SettingsSynchronizer::new(api.clone(), surface.clone(), &config.settings);
    let snapshots = SnapshotRequester::new(api.clone(), frames.clone(), surface.clone());

    let poller =
        StatusPoller::new(api.clone(), surface.clone(), config.status.poll_interval()).spawn();

    let feed = if config.feed.enabled {
        let viewer = FeedViewer::new(api.endpoint(VIDEO_FEED_PATH), frames.clone(), &config.feed)?;
        Some(viewer.spawn())
    } else {
        info!("Video feed disabled; snapshots are unavailable");
        None
    };

    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

    // Ctrl+C behaves like `quit`
    let ctrl_c_tx = cmd_tx.clone();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received, shutting down...");
        let _ = ctrl_c_tx.send(Command::Quit);
    })
    .context("Failed to install Ctrl+C handler")?;

    spawn_stdin_reader(cmd_tx, terminal.clone());
    terminal.print(&Usage.to_string());

    while let Some(command) = cmd_rx.recv().await {
        debug!("Console command: {:?}", command);
        match command {
            Command::Detection(raw) => {
                if let Err(e) = settings.set_detection_confidence(&raw) {
                    terminal.print(&e.to_string());
                }
            }
            Command::Tracking(raw) => {
                if let Err(e) = settings.set_tracking_confidence(&raw) {
                    terminal.print(&e.to_string());
                }
            }
            Command::Landmarks(show) => {
                settings.set_show_landmarks(show);
                terminal.print(&format!("show landmarks: {}", on_off(show)));
            }
            Command::Fps(show) => {
                settings.set_show_fps(show);
                terminal.print(&format!("show fps: {}", on_off(show)));
            }
            Command::Snapshot if !frames.is_loaded() => {
                terminal.print("snapshot unavailable: no frame displayed yet");
            }
            Command::Snapshot => {
                let snapshots = snapshots.clone();
                tokio::spawn(async move {
                    snapshots.request().await;
                });
            }
            Command::Settings => match serde_json::to_string(&settings.current()) {
                Ok(json) => terminal.print(&json),
                Err(e) => warn!("Failed to render settings: {}", e),
            },
            Command::Status => terminal.print_readouts(),
            Command::Help => terminal.print(&Usage.to_string()),
            Command::Quit => break,
        }
    }

    poller.abort();
    if let Some(feed) = feed {
        feed.abort();
    }

    Ok(())
}

/// Read operator commands on a plain thread; blocking stdin reads must not
/// hold up runtime shutdown
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Command>, terminal: Arc<TerminalSurface>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            };

            match Command::parse(&line) {
                Ok(Some(command)) => {
                    if tx.send(command).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => terminal.print(&format!("{} (type `help`)", e)),
            }
        }

        debug!("stdin closed");
        let _ = tx.send(Command::Quit);
    });
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn print_help() {
    println!("gesture-panel - operator console for a gesture-recognition server");
    println!();
    println!("USAGE:");
    println!("    gesture-panel [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help           Print this help message");
    println!("        --config <PATH>  Use this config file instead of the default");
    println!("        --server <URL>   Server base URL (overrides config)");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG                Set log level (e.g., debug, info, warn)");
    println!("    GESTURE_PANEL_SERVER    Server base URL (overrides config)");
    println!("    GESTURE_PANEL_LOG_PATH  Directory for log files");
    println!();
    println!("{}", Usage);
}
