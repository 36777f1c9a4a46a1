//! PDF export of the company record
//!
//! Layout happens in two steps: `layout_document` places every text run on
//! A4 pages using top-down millimetre coordinates, and `render_document`
//! hands the runs to printpdf. Keeping layout separate makes the wrapping and
//! pagination rules testable without parsing PDF output.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{require_loaded, ExportError};
use crate::data::{Company, Field};

/// Name of the exported file
pub const DOCUMENT_FILE_NAME: &str = "dados_cnpj.pdf";

const DOCUMENT_TITLE: &str = "Consulta de CNPJ";

/// A4 page size in millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;

const LEFT_MARGIN: f32 = 15.0;
const RIGHT_MARGIN: f32 = 195.0;
/// Horizontal distance from the label to its value
const VALUE_OFFSET: f32 = 60.0;
const LINE_HEIGHT: f32 = 10.0;

/// First baseline on a page
const TOP_MARGIN: f32 = 20.0;
/// Space between the title and the first field
const TITLE_GAP: f32 = 15.0;
/// Lowest baseline allowed before starting a new page
const BOTTOM_LIMIT: f32 = 282.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;

/// Millimetres per typographic point
const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;

/// A single line of text placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Distance from the left edge, in mm
    pub x: f32,
    /// Baseline distance from the top edge, in mm
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

/// Text runs of one page, in drawing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

/// Estimated rendered width of `text`, in mm
fn text_width(text: &str, size: f32) -> f32 {
    text.width() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// How many average glyphs fit in `width_mm`
fn columns_for(width_mm: f32, size: f32) -> usize {
    ((width_mm / (size * AVG_GLYPH_EM * PT_TO_MM)).floor() as usize).max(1)
}

/// Word-wraps `text` to at most `max_columns` display columns per line
///
/// Words wider than a full line are split. Always returns at least one line.
pub fn wrap_text(text: &str, max_columns: usize) -> Vec<String> {
    let max_columns = max_columns.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.width()
            } else {
                current.width() + 1 + word.width()
            };

            if needed <= max_columns {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if word.width() <= max_columns {
                current.push_str(word);
            } else {
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if current.width() + ch_width > max_columns && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    current.push(ch);
                }
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Places runs top to bottom, starting a new page when the cursor runs out
struct LayoutCursor {
    pages: Vec<Page>,
    y: f32,
}

impl LayoutCursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: TOP_MARGIN,
        }
    }

    fn push(&mut self, text: impl Into<String>, x: f32, size: f32, bold: bool) {
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.runs.push(TextRun {
                text: text.into(),
                x,
                y,
                size,
                bold,
            });
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP_MARGIN;
    }

    fn title(&mut self, text: &str) {
        let x = (PAGE_WIDTH - text_width(text, TITLE_SIZE)) / 2.0;
        self.push(text, x.max(LEFT_MARGIN), TITLE_SIZE, true);
        self.y += TITLE_GAP;
    }

    /// Writes `label:` and its wrapped value, one line height per value line
    fn field(&mut self, label: &str, value: &str) {
        let value_x = LEFT_MARGIN + VALUE_OFFSET;
        let columns = columns_for(RIGHT_MARGIN - value_x, BODY_SIZE);

        for (i, line) in wrap_text(value, columns).into_iter().enumerate() {
            if self.y > BOTTOM_LIMIT {
                self.new_page();
            }
            if i == 0 {
                self.push(format!("{}:", label), LEFT_MARGIN, BODY_SIZE, true);
            }
            self.push(line, value_x, BODY_SIZE, false);
            self.y += LINE_HEIGHT;
        }
    }
}

/// Lays out the title and every field of `record` on A4 pages
pub fn layout_document(record: &Company) -> Vec<Page> {
    let mut cursor = LayoutCursor::new();
    cursor.title(DOCUMENT_TITLE);

    for field in Field::ALL {
        cursor.field(field.document_label(), record.display(field));
    }

    cursor.pages
}

/// Renders laid-out pages to PDF bytes
pub fn render_document(pages: &[Page]) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..pages.len() {
        targets.push(doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1"));
    }

    for (page, (page_index, layer_index)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for run in &page.runs {
            let font: &IndirectFontRef = if run.bold { &bold } else { &regular };
            layer.use_text(
                run.text.clone(),
                run.size,
                Mm(run.x),
                Mm(PAGE_HEIGHT - run.y),
                font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

/// Writes `dados_cnpj.pdf` for the loaded record into `output_dir`
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(ExportError::NotLoaded)` - No record is loaded; nothing was written
pub fn export_document(record: Option<&Company>, output_dir: &Path) -> Result<PathBuf, ExportError> {
    let record = require_loaded(record)?;

    let pages = layout_document(record);
    let bytes = render_document(&pages)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(DOCUMENT_FILE_NAME);
    fs::write(&path, bytes)?;

    info!(path = %path.display(), pages = pages.len(), "PDF exported");
    Ok(path)
}
