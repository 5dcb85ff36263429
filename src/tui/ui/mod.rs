//! UI module: View components for the TUI.

pub mod dashboard;
pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub const CAPTION: &str =
    "Developed for disease prediction with probability & risk levels using trained ML models.";

pub fn render_footer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(CAPTION, MedicalTheme::text_secondary())]),
        Line::from(vec![Span::styled(
            "DISCLAIMER: Indicative estimates only. This tool does not replace professional medical evaluation.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
