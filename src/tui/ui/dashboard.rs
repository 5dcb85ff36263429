//! Dashboard view: disease selection screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::domain::Disease;
use crate::tui::styles::MedicalTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub selected: usize,
    pub model_dir: String,
    pub manifest_verified: bool,
}

impl DashboardState {
    #[must_use]
    pub fn selected_disease(&self) -> Disease {
        Disease::ALL[self.selected % Disease::ALL.len()]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % Disease::ALL.len();
    }

    pub fn prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(Disease::ALL.len() - 1);
    }
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Multiple Disease Prediction", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Kidney · Liver · Parkinson's",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Disease list
            Constraint::Percentage(45), // Status and actions
        ])
        .split(area);

    render_disease_list(f, chunks[0], state);
    render_status_panels(f, chunks[1], state);
}

fn render_disease_list(f: &mut Frame, area: Rect, state: &DashboardState) {
    let items: Vec<ListItem> = Disease::ALL
        .iter()
        .map(|disease| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<22}", disease.name()), MedicalTheme::text()),
                Span::styled(
                    format!("{} inputs", disease.profile().field_count()),
                    MedicalTheme::text_muted(),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(" Select Disease ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border_focused()),
        )
        .highlight_style(MedicalTheme::selected())
        .highlight_symbol("▌");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Model status
            Constraint::Min(0),    // Quick actions
        ])
        .split(area);

    let status_items = vec![
        format_status_item("Models Loaded", true),
        format_status_item("Manifest Verified", state.manifest_verified),
        Line::from(vec![
            Span::styled("  Directory: ", MedicalTheme::text_secondary()),
            Span::styled(state.model_dir.clone(), MedicalTheme::text()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" Model Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Choose", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Open Form", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("--", MedicalTheme::text_muted())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}
