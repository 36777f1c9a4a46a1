//! View-model for the company record
//!
//! Turns a record into the ordered list of label/value pairs every output
//! (terminal screen, plain text) renders.

use crate::data::{Company, Field};

/// One labeled value ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub label: &'static str,
    pub value: String,
}

/// Maps each known field of `record` to its label, in display order
///
/// Missing or blank values become the placeholder dash.
pub fn view_model(record: &Company) -> Vec<DisplayField> {
    Field::ALL
        .iter()
        .map(|&field| DisplayField {
            label: field.label(),
            value: record.display(field).to_string(),
        })
        .collect()
}

/// Renders the view-model as `Label: value` lines
pub fn to_plain_text(fields: &[DisplayField]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.label, f.value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, PLACEHOLDER};

    #[test]
    fn test_view_model_has_all_fields_in_order() {
        let fields = view_model(&fixtures::acme());
        let labels: Vec<&str> = fields.iter().map(|f| f.label).collect();

        assert_eq!(
            labels,
            vec![
                "Razão Social",
                "Nome Fantasia",
                "CNPJ",
                "Situação",
                "Abertura",
                "Natureza Jurídica",
                "CNAE",
                "Logradouro",
                "Número",
                "Complemento",
                "Bairro",
                "Município",
                "UF",
                "CEP",
            ]
        );
    }

    #[test]
    fn test_view_model_shows_legal_name() {
        let fields = view_model(&fixtures::acme());
        assert_eq!(fields[0].label, "Razão Social");
        assert_eq!(fields[0].value, "ACME LTDA");
    }

    #[test]
    fn test_missing_complement_renders_placeholder() {
        let fields = view_model(&fixtures::acme());
        let complemento = fields.iter().find(|f| f.label == "Complemento").unwrap();
        assert_eq!(complemento.value, PLACEHOLDER);
    }

    #[test]
    fn test_view_model_is_deterministic() {
        let record = fixtures::acme();
        assert_eq!(view_model(&record), view_model(&record));
    }

    #[test]
    fn test_plain_text_lines() {
        let text = to_plain_text(&view_model(&fixtures::acme()));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "Razão Social: ACME LTDA");
        assert_eq!(lines[13], "CEP: 01001000");
    }
}
