mod app;
mod config;
mod selector;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use selector::Person;

#[derive(Parser, Debug)]
#[command(name = "chipbox")]
#[command(version)]
#[command(about = "Pick people from a list and collect them as chips")]
struct Args {
    /// Load candidates from a TOML file with [[candidates]] entries
    #[arg(short, long, value_name = "FILE")]
    people: Option<PathBuf>,

    /// Print the final selection as JSON on exit
    #[arg(long)]
    print: bool,

    /// Print the candidate list as JSON and exit
    #[arg(short, long)]
    list: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = AppConfig::load();
    if let Some(path) = &args.people {
        config = config.with_people_file(path)?;
    }

    if args.list {
        println!("{}", serde_json::to_string_pretty(&config.candidates)?);
        return Ok(());
    }

    let selection = run_tui(&config)?;

    if args.print {
        println!("{}", serde_json::to_string(&selection)?);
    }
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::from_default_env());

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            registry
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => registry.with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init(),
    }
    Ok(())
}

fn run_tui(config: &AppConfig) -> Result<Vec<Person>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let area = terminal.size().ok().map(|s| Rect::new(0, 0, s.width, s.height));
    let mut app = App::new(config, area);
    tracing::info!("Started with {} candidates", config.candidates.len());

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result.map(|()| app.selection())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Resize(width, height) => app.resize(Rect::new(0, 0, width, height)),
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
