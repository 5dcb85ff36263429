//! Disease-specific input form.
//!
//! One control per profile field, rendered in declared order. Numeric
//! controls clamp their value to the field's range when an edit is
//! committed; categorical controls cycle through their two options.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::domain::{DiseaseProfile, FeatureVector, FieldKind, FieldSpec, FieldValue, FormError};
use crate::tui::styles::MedicalTheme;

/// Input control for a single field.
#[derive(Debug, Clone)]
pub struct FieldControl {
    pub spec: &'static FieldSpec,
    pub value: FieldValue,
    /// Text being typed; `None` when not editing.
    pub buffer: Option<String>,
}

impl FieldControl {
    fn new(spec: &'static FieldSpec) -> Self {
        Self {
            spec,
            value: spec.default_value(),
            buffer: None,
        }
    }

    /// Apply the pending edit. Unparsable text leaves the value unchanged.
    fn commit(&mut self) {
        let Some(text) = self.buffer.take() else {
            return;
        };
        if let Some(v) = text.trim().parse::<f64>().ok().and_then(|raw| self.spec.clamp(raw)) {
            self.value = FieldValue::Number(v);
        }
    }

    /// Current value as shown in the form.
    #[must_use]
    pub fn display(&self) -> String {
        if let Some(buffer) = &self.buffer {
            return buffer.clone();
        }
        match (self.spec.kind, self.value) {
            (FieldKind::Categorical { options, .. }, FieldValue::Choice(i)) => {
                options.get(i).copied().unwrap_or("?").to_string()
            }
            (FieldKind::Integer { .. }, FieldValue::Number(v)) => format!("{v:.0}"),
            (_, FieldValue::Number(v)) if v.fract() == 0.0 => format!("{v:.1}"),
            (_, FieldValue::Number(v)) => format!("{v}"),
            (_, FieldValue::Choice(i)) => i.to_string(),
        }
    }

    /// Allowed range or options, for the hint column.
    #[must_use]
    pub fn hint(&self) -> String {
        match self.spec.kind {
            FieldKind::Integer { min, max, .. } => format!("{min} – {max}"),
            FieldKind::Decimal { min, max, .. } => format!("{min} – {max}"),
            FieldKind::Categorical { options, .. } => format!("{} / {}", options[0], options[1]),
        }
    }
}

/// Form state for one disease.
#[derive(Debug, Clone)]
pub struct FormState {
    pub profile: &'static DiseaseProfile,
    pub controls: Vec<FieldControl>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl FormState {
    #[must_use]
    pub fn new(profile: &'static DiseaseProfile) -> Self {
        Self {
            profile,
            controls: profile.fields.iter().map(FieldControl::new).collect(),
            selected_field: 0,
            error_message: None,
        }
    }

    fn current(&mut self) -> &mut FieldControl {
        &mut self.controls[self.selected_field]
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.current().commit();
        self.selected_field = (self.selected_field + 1) % self.controls.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        self.current().commit();
        self.selected_field = self
            .selected_field
            .checked_sub(1)
            .unwrap_or(self.controls.len() - 1);
    }

    /// Type a character into the current numeric field.
    pub fn input_char(&mut self, c: char) {
        let control = self.current();
        if control.spec.is_categorical() {
            return;
        }
        if c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E') {
            control.buffer.get_or_insert_with(String::new).push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character of the current edit.
    pub fn delete_char(&mut self) {
        let control = self.current();
        if control.spec.is_categorical() {
            return;
        }
        let text = control.display();
        control.buffer.get_or_insert(text).pop();
    }

    /// Switch a categorical field to its other option.
    pub fn toggle_option(&mut self) {
        let control = self.current();
        if let FieldValue::Choice(i) = control.value {
            control.value = FieldValue::Choice(1 - i.min(1));
            self.error_message = None;
        }
    }

    /// Restore the current field to its default.
    pub fn reset_field(&mut self) {
        let control = self.current();
        control.buffer = None;
        control.value = control.spec.default_value();
    }

    /// Restore every field to its default.
    pub fn reset_all(&mut self) {
        *self = Self::new(self.profile);
    }

    /// Commit any pending edit and read all values in declared order.
    pub fn values(&mut self) -> Vec<FieldValue> {
        self.current().commit();
        self.controls.iter().map(|c| c.value).collect()
    }

    /// Commit any pending edit and assemble the feature vector.
    ///
    /// # Errors
    /// Returns [`FormError`] if the values do not fit the profile.
    pub fn to_feature_vector(&mut self) -> Result<FeatureVector, FormError> {
        let values = self.values();
        self.profile.assemble(&values)
    }
}

/// Render the input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(2), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state.profile);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, profile: &DiseaseProfile) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(format!("{} Prediction", profile.name()), MedicalTheme::title()),
        Span::styled(
            format!(" │ {} fields", profile.field_count()),
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

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let rows: Vec<Row> = state
        .controls
        .iter()
        .enumerate()
        .map(|(i, control)| {
            let value_style = if i == state.selected_field && control.buffer.is_some() {
                MedicalTheme::focused()
            } else {
                MedicalTheme::text()
            };
            let value = if control.spec.is_categorical() {
                format!("‹ {} ›", control.display())
            } else {
                control.display()
            };
            Row::new(vec![
                Cell::from(Span::styled(control.spec.label, MedicalTheme::text_secondary())),
                Cell::from(Span::styled(value, value_style)),
                Cell::from(Span::styled(control.hint(), MedicalTheme::text_muted())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
        ],
    )
    .header(
        Row::new(vec!["Field", "Value", "Range"])
            .style(MedicalTheme::subtitle())
            .bottom_margin(1),
    )
    .row_highlight_style(MedicalTheme::selected())
    .highlight_symbol("▌")
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    let mut table_state = TableState::default().with_selected(Some(state.selected_field));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→/Space] ", MedicalTheme::key_hint()),
            Span::styled("Toggle ", MedicalTheme::key_desc()),
            Span::styled("[Del] ", MedicalTheme::key_hint()),
            Span::styled("Default ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled(
                format!("Predict {} ", state.profile.name()),
                MedicalTheme::key_desc(),
            ),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
