//! WhatsApp share link
//!
//! Builds a plain-text summary of the record and wraps it in a `wa.me` link.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::info;

use super::{require_loaded, ExportError, LinkLauncher};
use crate::data::{Company, Field};

/// Prefix of the share link; the encoded text is appended
pub const SHARE_BASE_URL: &str = "https://wa.me/?text=";

/// Characters left unescaped by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Formats the record as the text block sent in the share link
pub fn share_text(record: &Company) -> String {
    let line = |field: Field| format!("{}: {}", field.label(), record.display(field));

    let address = format!(
        "Endereço: {}, {}, {}, {} - {}, CEP: {}",
        record.display(Field::Logradouro),
        record.display(Field::Numero),
        record.display(Field::Bairro),
        record.display(Field::Municipio),
        record.display(Field::Uf),
        record.display(Field::Cep),
    );

    [
        "Consulta CNPJ:".to_string(),
        line(Field::RazaoSocial),
        line(Field::NomeFantasia),
        line(Field::Cnpj),
        line(Field::Situacao),
        line(Field::Abertura),
        line(Field::NaturezaJuridica),
        line(Field::Cnae),
        address,
    ]
    .join("\n")
}

/// Builds the `wa.me` link carrying the share text
pub fn share_link(record: &Company) -> String {
    format!(
        "{}{}",
        SHARE_BASE_URL,
        utf8_percent_encode(&share_text(record), URI_COMPONENT)
    )
}

/// Opens the share link for the loaded record
///
/// # Returns
/// * `Ok(String)` - The link that was opened
/// * `Err(ExportError::NotLoaded)` - No record is loaded; nothing was opened
/// * `Err(ExportError::Launch)` - The system opener failed; carries the link
pub fn export_share_link(
    record: Option<&Company>,
    launcher: &dyn LinkLauncher,
) -> Result<String, ExportError> {
    let record = require_loaded(record)?;
    let link = share_link(record);
    if let Err(source) = launcher.open(&link) {
        return Err(ExportError::Launch { link, source });
    }
    info!("share link opened");
    Ok(link)
}
