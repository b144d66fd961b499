//! Rover Console: terminal control panel for a remotely operated robot.
//!
//! ## Usage
//!
//! ```bash
//! # Robot server on localhost:5000 (default)
//! rover-console
//!
//! # Remote robot, slower polling
//! rover-console --endpoint http://rover.local:5000 --status-interval-ms 5000
//! ```
//!
//! Logs go to `rover-console.log` (see `ROVER_LOG_FILE`) since the terminal
//! belongs to the UI.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use rover_console::api::RobotApiClient;
use rover_console::input::map_key;
use rover_console::media::ImageStore;
use rover_console::{ui, ConsoleConfig, Session};
use rover_telemetry::{init_telemetry, log_event, TelemetryConfig};

/// Rover Console: terminal control panel for a remotely operated robot
#[derive(Parser, Debug)]
#[command(name = "rover-console")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Robot server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    endpoint: String,

    /// Status poll interval in milliseconds
    #[arg(long, default_value = "2000")]
    status_interval_ms: u64,

    /// Map refresh interval in seconds
    #[arg(long, default_value = "15")]
    map_interval_secs: u64,

    /// Seconds each movement command runs for
    #[arg(long, default_value = "1.0")]
    duration: f64,

    /// Directory for decoded snapshot and map images
    #[arg(long, default_value = "media")]
    media_dir: PathBuf,
}

impl Args {
    fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            status_interval: Duration::from_millis(self.status_interval_ms.max(100)),
            map_interval: Duration::from_secs(self.map_interval_secs.max(1)),
            command_duration: self.duration,
            ..ConsoleConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _telemetry = init_telemetry(&TelemetryConfig::from_env()).context("Failed to set up logging")?;
    log_event!(info, "session", "Starting rover console", endpoint = %args.endpoint);

    let client = RobotApiClient::new(&args.endpoint).context("Failed to create API client")?;
    let mut session = Session::new(
        Arc::new(client),
        ImageStore::new(&args.media_dir),
        args.console_config(),
    );

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut session).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log_event!(error, "session", "Console exited with error", error = %e);
    }
    result
}

/// Main application loop.
async fn run_app<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> Result<()> {
    session.start(Instant::now());

    loop {
        terminal.draw(|frame| ui::render(frame, session.app()))?;

        session.drain_events();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let Some(key) = map_key(key) {
                    session.handle_key(key, Instant::now());
                }
            }
        }

        session.tick(Instant::now());

        if session.should_quit() {
            log_event!(info, "session", "Quit requested");
            return Ok(());
        }
    }
}
