//! Company detail screen UI
//!
//! Renders the loaded record as a bordered list of label/value rows, plus the
//! loading and error screens and the footer with the last notice.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LoadState, NoticeKind, RecordSource};
use crate::presenter::DisplayField;

mod colors {
    use ratatui::style::Color;

    /// Section headers and borders
    pub const HEADER: Color = Color::Cyan;
    /// Field labels
    pub const LABEL: Color = Color::Yellow;
    /// Field values
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::DarkGray;
    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
}

/// Width reserved for the label column
const LABEL_WIDTH: usize = 20;

/// Renders the screen for the current load state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    match &app.state {
        LoadState::Loading => render_loading(frame, chunks[0]),
        LoadState::Failed(message) => render_error(frame, chunks[0], message),
        LoadState::Ready => match app.fields() {
            Some(fields) => render_fields(frame, chunks[0], &fields, app.source),
            None => render_loading(frame, chunks[0]),
        },
    }

    render_notice(frame, chunks[1], app);
    render_help_text(frame, chunks[2]);
}

/// Builds one `Label: value` line
fn field_line(field: &DisplayField) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", format!("{}:", field.label), width = LABEL_WIDTH),
            Style::default()
                .fg(colors::LABEL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(field.value.clone(), Style::default().fg(colors::PRIMARY)),
    ])
}

fn render_fields(
    frame: &mut Frame,
    area: Rect,
    fields: &[DisplayField],
    source: Option<RecordSource>,
) {
    let subtitle = match source {
        Some(RecordSource::Cache) => " cache ",
        Some(RecordSource::Registry) => " BrasilAPI ",
        None => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            " Consulta de CNPJ ",
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            subtitle,
            Style::default().fg(colors::SECONDARY),
        )));

    let lines: Vec<Line> = fields.iter().map(field_line).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Carregando dados do CNPJ...")
        .style(Style::default().fg(colors::HEADER))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ERROR))
        .title(" Consulta de CNPJ ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Min(2),
            Constraint::Percentage(40),
        ])
        .split(inner);

    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(colors::ERROR),
        )),
        Line::from(Span::styled(
            "Pressione r para tentar novamente",
            Style::default().fg(colors::SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
}

fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = &app.notice else {
        return;
    };

    let color = match notice.kind {
        NoticeKind::Info => colors::SUCCESS,
        NoticeKind::Error => colors::ERROR,
    };

    let paragraph = Paragraph::new(Span::styled(
        format!(" {}", notice.text),
        Style::default().fg(color),
    ));
    frame.render_widget(paragraph, area);
}

fn render_help_text(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(colors::LABEL);
    let text = Style::default().fg(colors::SECONDARY);

    let line = Line::from(vec![
        Span::styled(" p", key),
        Span::styled(" PDF  ", text),
        Span::styled("w", key),
        Span::styled(" WhatsApp  ", text),
        Span::styled("r", key),
        Span::styled(" atualizar  ", text),
        Span::styled("?", key),
        Span::styled(" ajuda  ", text),
        Span::styled("q", key),
        Span::styled(" sair", text),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
