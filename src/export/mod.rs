//! Export actions for the loaded company record
//!
//! Both exporters refuse to run until a record with an identifier is loaded,
//! and produce nothing in that case.

pub mod launch;
pub mod pdf;
pub mod share;

pub use launch::{LaunchError, LinkLauncher, SystemLauncher};
pub use pdf::{export_document, DOCUMENT_FILE_NAME};
pub use share::{export_share_link, share_link, share_text};

use thiserror::Error;

use crate::data::Company;

/// Errors that can occur during an export
#[derive(Debug, Error)]
pub enum ExportError {
    /// No record is loaded yet
    #[error("Dados do CNPJ não carregados ainda.")]
    NotLoaded,

    /// The PDF library rejected the document
    #[error("Falha ao gerar o PDF: {0}")]
    Pdf(String),

    /// Writing the output file failed
    #[error("Falha ao gravar o arquivo: {0}")]
    Io(#[from] std::io::Error),

    /// The share link was built but could not be opened
    #[error("Falha ao abrir o link: {source}")]
    Launch {
        link: String,
        #[source]
        source: LaunchError,
    },
}

/// Returns the record if it is loaded, or `ExportError::NotLoaded`
fn require_loaded(record: Option<&Company>) -> Result<&Company, ExportError> {
    record
        .filter(|r| r.is_loaded())
        .ok_or(ExportError::NotLoaded)
}
