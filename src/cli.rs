//! Command-line interface parsing for the CNPJ viewer
//!
//! Parses CLI arguments using clap. Without flags the viewer opens the
//! terminal UI; `--print`, `--pdf` and `--share` run one action headless.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// More than one headless action was requested
    #[error("Conflicting actions: {0}. Choose one of --print, --pdf or --share")]
    ConflictingActions(String),
}

/// CNPJ viewer - look up the company record, export it to PDF or share it
#[derive(Parser, Debug)]
#[command(name = "cnpjview")]
#[command(about = "CNPJ registry lookup with PDF export and WhatsApp sharing")]
#[command(version)]
pub struct Cli {
    /// Print the record to stdout and exit
    #[arg(long)]
    pub print: bool,

    /// Write dados_cnpj.pdf and exit
    #[arg(long)]
    pub pdf: bool,

    /// Open the WhatsApp share link and exit
    #[arg(long)]
    pub share: bool,

    /// Ignore the cached record and fetch a fresh one
    #[arg(long)]
    pub refresh: bool,

    /// Directory the PDF is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory holding the cached record (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the viewer does after loading the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Terminal UI with key bindings
    #[default]
    Interactive,
    /// Print the fields and exit
    Print,
    /// Export the PDF and exit
    Pdf,
    /// Open the share link and exit
    Share,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: Mode,
    /// Skip the cache lookup on start
    pub refresh: bool,
    pub output_dir: PathBuf,
    pub cache_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Interactive,
            refresh: false,
            output_dir: PathBuf::from("."),
            cache_dir: None,
            verbose: false,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if more than one headless action was given
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let requested: Vec<(&str, Mode)> = [
            ("--print", cli.print, Mode::Print),
            ("--pdf", cli.pdf, Mode::Pdf),
            ("--share", cli.share, Mode::Share),
        ]
        .into_iter()
        .filter(|(_, set, _)| *set)
        .map(|(flag, _, mode)| (flag, mode))
        .collect();

        let mode = match requested.as_slice() {
            [] => Mode::Interactive,
            [(_, mode)] => *mode,
            many => {
                let flags: Vec<&str> = many.iter().map(|(flag, _)| *flag).collect();
                return Err(CliError::ConflictingActions(flags.join(", ")));
            }
        };

        Ok(StartupConfig {
            mode,
            refresh: cli.refresh,
            output_dir: cli.output_dir.clone(),
            cache_dir: cli.cache_dir.clone(),
            verbose: cli.verbose,
        })
    }

    /// Whether the run is headless (no terminal UI)
    pub fn is_headless(&self) -> bool {
        self.mode != Mode::Interactive
    }
}
