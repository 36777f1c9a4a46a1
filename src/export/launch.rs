//! Opens links in the system browser
//!
//! Uses the platform opener:
//! - macOS: `open`
//! - Linux: `xdg-open`
//! - Windows: `cmd /C start`

use std::process::{Command, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Opening links is not supported on this platform")]
    Unsupported,
}

/// Something that can open a URL for the user
pub trait LinkLauncher {
    fn open(&self, url: &str) -> Result<(), LaunchError>;
}

/// Opens URLs with the operating system's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl LinkLauncher for SystemLauncher {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        let (program, args) = opener_command(url).ok_or(LaunchError::Unsupported)?;
        spawn_detached(program, &args)
    }
}

/// Starts `program` without waiting for it to finish
fn spawn_detached(program: &'static str, args: &[String]) -> Result<(), LaunchError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| LaunchError::Spawn { program, source })?;

    // Reaped off the caller's thread so the UI never blocks on the browser.
    thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

/// Program and arguments that open `url` on this platform
fn opener_command(url: &str) -> Option<(&'static str, Vec<String>)> {
    #[cfg(target_os = "macos")]
    {
        Some(("open", vec![url.to_string()]))
    }

    #[cfg(target_os = "windows")]
    {
        // `start` treats the first quoted argument as a window title
        Some((
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        ))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Some(("xdg-open", vec![url.to_string()]))
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    {
        let _ = url;
        None
    }
}
