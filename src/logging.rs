//! Logging setup
//!
//! Headless runs log to stderr. The terminal UI owns the screen, so
//! interactive runs log to a file instead.

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file used by the terminal UI
pub const LOG_FILE_NAME: &str = "cnpjview.log";

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogOutput {
    Stderr,
    /// Append to `<dir>/cnpjview.log`
    File(PathBuf),
}

fn default_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "cnpjview=debug,warn"
    } else {
        "cnpjview=info,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

fn make_writer(output: &LogOutput) -> BoxMakeWriter {
    match output {
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::File(dir) => {
            let file = fs::create_dir_all(dir).and_then(|_| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join(LOG_FILE_NAME))
            });
            match file {
                Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
                // Never fall back to stderr here; it would draw over the UI.
                Err(_) => BoxMakeWriter::new(io::sink),
            }
        }
    }
}

/// Colour only when writing straight to a terminal
fn use_ansi(output: &LogOutput, stderr_is_terminal: bool) -> bool {
    matches!(output, LogOutput::Stderr) && stderr_is_terminal
}

/// Installs the global subscriber
pub fn init_logger(verbose: bool, output: LogOutput) {
    let ansi = use_ansi(&output, io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer(&output))
                .with_ansi(ansi)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_output_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");

        let _writer = make_writer(&LogOutput::File(dir.clone()));

        assert!(dir.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_ansi_only_for_interactive_stderr() {
        assert!(use_ansi(&LogOutput::Stderr, true));
        assert!(!use_ansi(&LogOutput::Stderr, false));
        assert!(!use_ansi(&LogOutput::File(PathBuf::from("/tmp")), true));
    }
}
