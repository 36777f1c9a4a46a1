//! Application state management for the CNPJ viewer
//!
//! `App` owns the loaded record and everything needed to obtain and export
//! it: the registry client, the cache and the link launcher. Handlers take the
//! app by reference instead of sharing global state.

use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::cache::{CompanyCache, FileStore};
use crate::cli::StartupConfig;
use crate::data::{Company, RegistryClient};
use crate::export::{self, ExportError, LinkLauncher, SystemLauncher};
use crate::presenter::{self, DisplayField};

/// Load status of the company record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Waiting for the cache or the registry
    Loading,
    /// A record is available
    Ready,
    /// The fetch failed; holds the message shown to the user
    Failed(String),
}

/// Where the current record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Cache,
    Registry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A one-line message shown in the footer after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current load status
    pub state: LoadState,
    /// The record currently held in memory
    pub record: Option<Company>,
    /// Where `record` came from
    pub source: Option<RecordSource>,
    /// Result of the last export or refresh
    pub notice: Option<Notice>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Registry API client
    client: RegistryClient,
    /// Cache for the record; `None` when no cache directory is available
    cache: Option<CompanyCache>,
    /// Opens the share link
    launcher: Box<dyn LinkLauncher>,
    /// Where the PDF is written
    output_dir: PathBuf,
}

impl App {
    /// Creates a new App from the startup configuration
    pub fn new(config: &StartupConfig) -> Self {
        let store = match &config.cache_dir {
            Some(dir) => Some(FileStore::with_dir(dir.clone())),
            None => FileStore::new(),
        };
        if store.is_none() {
            warn!("no cache directory available, caching disabled");
        }

        Self::with_parts(
            RegistryClient::new(),
            store.map(|s| CompanyCache::new(Box::new(s))),
            Box::new(SystemLauncher),
            config.output_dir.clone(),
        )
    }

    /// Creates a new App from explicit parts
    pub fn with_parts(
        client: RegistryClient,
        cache: Option<CompanyCache>,
        launcher: Box<dyn LinkLauncher>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            state: LoadState::Loading,
            record: None,
            source: None,
            notice: None,
            should_quit: false,
            refresh_requested: false,
            show_help: false,
            client,
            cache,
            launcher,
            output_dir,
        }
    }

    /// The cache, if one is configured
    pub fn cache(&self) -> Option<&CompanyCache> {
        self.cache.as_ref()
    }

    /// The view-model for the current record
    pub fn fields(&self) -> Option<Vec<DisplayField>> {
        self.record.as_ref().map(presenter::view_model)
    }

    /// Loads the record from the cache, falling back to the registry
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;

        if let Some(record) = self.cache.as_mut().and_then(|c| c.load()) {
            info!("company record loaded from cache");
            self.record = Some(record);
            self.source = Some(RecordSource::Cache);
            self.state = LoadState::Ready;
            return;
        }

        // A miss starts from an empty record; nothing stale survives a failed fetch.
        self.record = None;
        self.source = None;

        if let Err(message) = self.fetch_and_store().await {
            self.state = LoadState::Failed(message);
        }
    }

    /// Fetches a fresh record, bypassing the cache
    ///
    /// On failure the record already on screen is kept and the error is
    /// reported as a notice.
    pub async fn refresh(&mut self) {
        self.refresh_requested = false;

        if self.record.is_none() {
            self.state = LoadState::Loading;
        }

        match self.fetch_and_store().await {
            Ok(()) => self.notice = Some(Notice::info("Dados atualizados.")),
            Err(message) => {
                if self.record.is_some() {
                    self.notice = Some(Notice::error(message));
                } else {
                    self.state = LoadState::Failed(message);
                }
            }
        }
    }

    /// Runs the fetch, caching and adopting the record on success
    ///
    /// Returns the user-facing error message on failure.
    async fn fetch_and_store(&mut self) -> Result<(), String> {
        match self.client.fetch().await {
            Ok(record) => {
                info!("company record fetched from registry");
                if let Some(cache) = self.cache.as_mut() {
                    if let Err(err) = cache.save(&record) {
                        warn!(error = %err, "failed to cache company record");
                    }
                }
                self.record = Some(record);
                self.source = Some(RecordSource::Registry);
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to fetch company record");
                Err(format!("Erro: {}", err))
            }
        }
    }

    /// Exports the current record to `dados_cnpj.pdf`
    pub fn export_pdf(&mut self) -> Result<PathBuf, ExportError> {
        let result = export::export_document(self.record.as_ref(), &self.output_dir);
        self.notice = Some(match &result {
            Ok(path) => Notice::info(format!("PDF salvo em {}", path.display())),
            Err(err) => Notice::error(err.to_string()),
        });
        result
    }

    /// Opens the WhatsApp share link for the current record
    pub fn share(&mut self) -> Result<String, ExportError> {
        let result = export::export_share_link(self.record.as_ref(), self.launcher.as_ref());
        self.notice = Some(match &result {
            Ok(_) => Notice::info("Link do WhatsApp aberto."),
            Err(err) => Notice::error(err.to_string()),
        });
        result
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `p`: Export the PDF
    /// - `w`: Share on WhatsApp
    /// - `r`: Refresh from the registry
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('p') => {
                // Outcome is reported through the notice
                let _ = self.export_pdf();
            }
            KeyCode::Char('w') => {
                let _ = self.share();
            }
            KeyCode::Char('r') => {
                if self.state != LoadState::Loading {
                    self.refresh_requested = true;
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }
}
