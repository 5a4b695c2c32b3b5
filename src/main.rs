use std::fs::OpenOptions;
use std::io;

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{LevelFilter, info};
use ratatui::prelude::*;

mod config;
mod service;
mod storage;
mod tui;

use config::Config;
use service::NoteService;
use storage::JsonStore;
use tui::app::App;

/// Log to a file beside the data; stderr belongs to the terminal UI once it
/// starts, so setup problems are printed before that and the app runs unlogged.
fn init_logging(config: &Config) {
    let file = std::fs::create_dir_all(&config.data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
    });
    let file = match file {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Logging disabled: cannot open {}: {}",
                config.log_file.display(),
                e
            );
            return;
        }
    };
    if let Err(e) = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
    {
        eprintln!("Logging disabled: {}", e);
    }
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    while !app.should_quit {
        terminal.draw(|f| app.render(f))?;
        app.handle_event(event::read()?)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::from_home();
    init_logging(&config);
    info!("Starting QuickNotes with data file {}", config.data_file.display());

    let mut app = App::new(NoteService::new(JsonStore::new(&config.data_file)));

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode. Make sure you're running in a terminal.")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .context("Failed to enter alternate screen. Make sure you're running in a terminal.")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("QuickNotes exiting");
    result
}
