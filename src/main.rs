//! CNPJ viewer - look up a company in the CNPJ registry
//!
//! A terminal application that shows the registry record for one company,
//! caches it for a day, and exports it as a PDF or a WhatsApp share link.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use cnpjview::app::{App, LoadState};
use cnpjview::cache::FileStore;
use cnpjview::cli::{Cli, Mode, StartupConfig};
use cnpjview::export::ExportError;
use cnpjview::logging::{self, LogOutput};
use cnpjview::{presenter, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_company_detail(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Loads the record as the startup flags ask
async fn load(app: &mut App, config: &StartupConfig) {
    if config.refresh {
        app.refresh().await;
    } else {
        app.load().await;
    }
}

/// Runs one action without the terminal UI
async fn run_headless(mut app: App, config: &StartupConfig) -> ExitCode {
    load(&mut app, config).await;

    if let LoadState::Failed(message) = &app.state {
        eprintln!("{}", message);
        return ExitCode::FAILURE;
    }

    let result = match config.mode {
        Mode::Print => {
            if let Some(fields) = app.fields() {
                println!("{}", presenter::to_plain_text(&fields));
            }
            Ok(())
        }
        Mode::Pdf => app
            .export_pdf()
            .map(|path| println!("PDF salvo em {}", path.display())),
        Mode::Share => match app.share() {
            Ok(link) => {
                println!("{}", link);
                Ok(())
            }
            // Without an opener the link is still useful on stdout.
            Err(ExportError::Launch { link, source }) => {
                println!("{}", link);
                warn!(error = %source, "could not open the share link");
                Ok(())
            }
            Err(err) => Err(err),
        },
        Mode::Interactive => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run_interactive(mut app: App, config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial render to show loading state
    terminal.draw(|f| render_ui(f, &app))?;

    // Trigger initial data load
    load(&mut app, config).await;

    // Main event loop
    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        if app.refresh_requested {
            app.refresh().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::from(2));
        }
    };

    let log_output = if config.is_headless() {
        LogOutput::Stderr
    } else {
        let dir = config
            .cache_dir
            .clone()
            .or_else(|| FileStore::new().map(|s| s.dir().to_path_buf()))
            .unwrap_or_else(std::env::temp_dir);
        LogOutput::File(dir)
    };
    logging::init_logger(config.verbose, log_output);
    info!(mode = ?config.mode, "starting cnpjview");

    let app = App::new(&config);

    if config.is_headless() {
        Ok(run_headless(app, &config).await)
    } else {
        run_interactive(app, &config).await?;
        Ok(ExitCode::SUCCESS)
    }
}
