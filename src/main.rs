mod app;
mod config;
mod error;
mod notifier;
mod storage;
mod tasks;
mod theme;
mod timer;
mod ui;
mod view;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{fs, io, path::Path, sync::Mutex, time::{Duration, Instant}};
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Args, Config, LOG_FILE, STORAGE_FILE};
use error::{Error, Result};
use notifier::{DesktopSink, Notifier};
use storage::JsonFileStore;
use theme::ThemeManager;
use timer::Timer;

// ============================================================================
// Constants
// ============================================================================

const FRAME_RATE: Duration = Duration::from_millis(50);
const LOG_ENV: &str = "POMOTASK_LOG";

// ============================================================================
// Logging
// ============================================================================

fn init_logging(dir: &Path, default_level: &str) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.data_dir)?;
    init_logging(&args.data_dir, &args.log_level)?;

    let mut config = Config::load(&args.data_dir);
    config.apply_args(&args);
    tracing::info!(?config, data_dir = %args.data_dir.display(), "starting pomotask");

    let store = JsonFileStore::open(args.data_dir.join(STORAGE_FILE));
    let theme = ThemeManager::new(Box::new(store), theme::prefers_dark_from_env());
    let notifier = Notifier::new(Box::new(DesktopSink), config.notifications);
    let mut app = App::new(Timer::new(config.session_config()), theme, notifier);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(%err, "terminal loop failed");
    }
    tracing::info!(pomodoros = app.timer.completed_pomodoros(), "exiting");
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render_ui(f, app))?;

        let timeout = app
            .timer
            .until_next_tick(Instant::now())
            .map_or(FRAME_RATE, |due| due.min(FRAME_RATE));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key, Instant::now()) {
                    return Ok(());
                }
            }
        }

        app.on_clock(Instant::now());
    }
}
