//! Core data model for the CNPJ viewer
//!
//! This module contains the company record as returned by the registry API
//! and the fixed set of fields the viewer displays and exports.

pub mod registry;

pub use registry::{FetchError, RegistryClient, CNPJ};

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Shown in place of a field the registry left empty
pub const PLACEHOLDER: &str = "—";

/// A company record from the CNPJ registry
///
/// Every known field is optional text. The registry sends some values as
/// numbers, which are kept as their decimal text. Fields the viewer does not
/// know about are kept in `extra` so a cached record round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Legal name
    #[serde(default, deserialize_with = "lenient_text")]
    pub razao_social: Option<String>,
    /// Trade name
    #[serde(default, deserialize_with = "lenient_text")]
    pub nome_fantasia: Option<String>,
    /// The 14-digit identifier
    #[serde(default, deserialize_with = "lenient_text")]
    pub cnpj: Option<String>,
    /// Registration status (e.g. "ATIVA")
    #[serde(default, deserialize_with = "lenient_text")]
    pub descricao_situacao_cadastral: Option<String>,
    /// Founding date as sent by the registry (YYYY-MM-DD)
    #[serde(default, deserialize_with = "lenient_text")]
    pub data_inicio_atividade: Option<String>,
    /// Legal nature description
    #[serde(default, deserialize_with = "lenient_text")]
    pub natureza_juridica: Option<String>,
    /// Main activity description
    #[serde(default, deserialize_with = "lenient_text")]
    pub cnae_fiscal_descricao: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub logradouro: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub complemento: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bairro: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub municipio: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub uf: Option<String>,
    /// Postal code
    #[serde(default, deserialize_with = "lenient_text")]
    pub cep: Option<String>,
    /// Everything else the registry returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The fields shown on screen and written to exports, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RazaoSocial,
    NomeFantasia,
    Cnpj,
    Situacao,
    Abertura,
    NaturezaJuridica,
    Cnae,
    Logradouro,
    Numero,
    Complemento,
    Bairro,
    Municipio,
    Uf,
    Cep,
}

impl Field {
    /// All fields in display order
    pub const ALL: [Field; 14] = [
        Field::RazaoSocial,
        Field::NomeFantasia,
        Field::Cnpj,
        Field::Situacao,
        Field::Abertura,
        Field::NaturezaJuridica,
        Field::Cnae,
        Field::Logradouro,
        Field::Numero,
        Field::Complemento,
        Field::Bairro,
        Field::Municipio,
        Field::Uf,
        Field::Cep,
    ];

    /// Label used on screen and in the share text
    pub fn label(self) -> &'static str {
        match self {
            Field::RazaoSocial => "Razão Social",
            Field::NomeFantasia => "Nome Fantasia",
            Field::Cnpj => "CNPJ",
            Field::Situacao => "Situação",
            Field::Abertura => "Abertura",
            Field::NaturezaJuridica => "Natureza Jurídica",
            Field::Cnae => "CNAE",
            Field::Logradouro => "Logradouro",
            Field::Numero => "Número",
            Field::Complemento => "Complemento",
            Field::Bairro => "Bairro",
            Field::Municipio => "Município",
            Field::Uf => "UF",
            Field::Cep => "CEP",
        }
    }

    /// Label used in the PDF document
    pub fn document_label(self) -> &'static str {
        match self {
            Field::Abertura => "Data de Abertura",
            other => other.label(),
        }
    }
}

impl Company {
    /// Returns the raw value of a field, or `None` if it is missing or blank
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::RazaoSocial => &self.razao_social,
            Field::NomeFantasia => &self.nome_fantasia,
            Field::Cnpj => &self.cnpj,
            Field::Situacao => &self.descricao_situacao_cadastral,
            Field::Abertura => &self.data_inicio_atividade,
            Field::NaturezaJuridica => &self.natureza_juridica,
            Field::Cnae => &self.cnae_fiscal_descricao,
            Field::Logradouro => &self.logradouro,
            Field::Numero => &self.numero,
            Field::Complemento => &self.complemento,
            Field::Bairro => &self.bairro,
            Field::Municipio => &self.municipio,
            Field::Uf => &self.uf,
            Field::Cep => &self.cep,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Returns the value to display for a field, falling back to the placeholder
    pub fn display(&self, field: Field) -> &str {
        self.get(field).unwrap_or(PLACEHOLDER)
    }

    /// Whether this record carries an identifier and can be exported
    pub fn is_loaded(&self) -> bool {
        self.get(Field::Cnpj).is_some()
    }
}

/// Accepts a string, number, boolean or null where text is expected
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected text, found {}",
            other
        ))),
    }
}
