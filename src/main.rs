mod app;
mod clock;
mod config;
mod domain;
mod error;
mod input;
mod logging;
mod persistence;
mod report;
mod ticker;
mod timer;
mod ui;
mod workday;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use clock::SystemClock;
use config::TallyConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{ensure_dir, get_data_dir, init_local_data_dir, JsonStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use workday::Workday;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A terminal time tracker for the tasks and projects of your day", long_about = None)]
struct Cli {
    /// Use this data directory instead of a local or home .tally
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tally directory in the current directory
    Init,
    /// Print today's totals
    Report,
    /// Print the running timer, if any
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        TallyConfig::write_default(&data_dir)?;
        println!("Initialized tally directory: {}", data_dir.display());
        println!();
        println!("tally will now use this local directory for its day files.");
        println!("Run 'tally' to start tracking time.");
        return Ok(());
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    ensure_dir(&data_dir)?;

    let config = TallyConfig::load(&data_dir)?;
    let level = logging::resolve_level(cli.log_level, config.log_level.as_deref());
    logging::enable_logging(&data_dir, &level)?;
    info!(data_dir = %data_dir.display(), "starting tally");

    let day = load_workday(&data_dir, &config)?;

    match cli.command {
        Some(Commands::Report) => {
            print!("{}", report::generate_report(&day));
            Ok(())
        }
        Some(Commands::Status) => {
            println!("{}", report::status_line(&day));
            Ok(())
        }
        _ => run_tui(day, &config),
    }
}

/// Open the store and restore today's state. Failing here stops the program.
fn load_workday(data_dir: &std::path::Path, config: &TallyConfig) -> Result<Workday> {
    let store = JsonStore::open(data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    debug!(dir = %store.dir().display(), "store opened");
    Workday::load(
        Box::new(store),
        Box::new(SystemClock),
        Duration::from_millis(config.tick_interval_ms),
    )
    .map_err(|e| {
        error!(error = %e, "failed to load today's records");
        e
    })
    .context("Failed to load today's records")
}

fn run_tui(day: Workday, config: &TallyConfig) -> Result<()> {
    let mut app = AppState::new(day, config.use_emoji);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, ticker::poll_duration(config.poll_interval_ms));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // The timer is left running on quit and restored next start
    info!(
        timer = app.day.timer_state().to_tag(),
        open_entry = ?app.day.timer().active_entry_id(),
        "tally closed"
    );

    if let Err(err) = result {
        error!(error = %err, "event loop failed");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    poll_rate: Duration,
) -> Result<()> {
    loop {
        // Check for midnight crossing - close the day and force restart
        if app.ui_mode != domain::UiMode::DayChanged && app.has_day_changed() {
            info!(date = %app.day.date(), "day changed, asking for restart");
            app.end_day();
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick();
    }
}
