//! Prediction result view.

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Disease, PredictionReport};
use crate::tui::styles::MedicalTheme;

/// Time the gauge spends on each percentage point.
pub const PROGRESS_STEP: Duration = Duration::from_millis(10);

/// Gauge value after `elapsed`, rising one point per step up to `target`.
#[must_use]
pub fn progress_at(elapsed: Duration, target: u16) -> u16 {
    let steps = elapsed.as_millis() / PROGRESS_STEP.as_millis();
    u16::try_from(steps).unwrap_or(u16::MAX).min(target)
}

/// Cosmetic fill animation for the probability gauge.
#[derive(Debug, Clone, Copy)]
pub struct ProgressAnimation {
    pub target: u16,
    pub shown: u16,
    started_at: Instant,
}

impl ProgressAnimation {
    #[must_use]
    pub fn start(target: u16) -> Self {
        Self {
            target,
            shown: 0,
            started_at: Instant::now(),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.started_at);
        self.shown = self.shown.max(progress_at(elapsed, self.target));
    }

    pub fn skip(&mut self) {
        self.shown = self.target;
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.shown >= self.target
    }
}

/// Result screen state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Prediction available; gauge may still be filling
    Ready {
        report: PredictionReport,
        progress: ProgressAnimation,
    },
    /// The request failed
    Error { disease: Disease, message: String },
}

impl ResultState {
    #[must_use]
    pub fn ready(report: PredictionReport) -> Self {
        let progress = ProgressAnimation::start(report.progress_target());
        Self::Ready { report, progress }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Self::Ready { progress, .. } = self {
            progress.tick(now);
        }
    }

    /// Finish the animation immediately. Returns false if nothing was running.
    pub fn skip_animation(&mut self) -> bool {
        match self {
            Self::Ready { progress, .. } if !progress.is_done() => {
                progress.skip();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&PredictionReport> {
        match self {
            Self::Ready { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Render the prediction result
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Ready { report, progress } => render_report(f, chunks[1], report, progress),
        ResultState::Error { disease, message } => render_error(f, chunks[1], *disease, message),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Result", MedicalTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(Line::from(Span::styled(
        "Fill in the form and press Enter to predict",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_report(f: &mut Frame, area: Rect, report: &PredictionReport, progress: &ProgressAnimation) {
    let block = Block::default()
        .title(Span::styled(" Disease Probability & Risk ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Verdict
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Probability metric
            Constraint::Length(2), // Risk level
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let verdict = if report.result.is_positive() {
        Line::from(vec![
            Span::styled("⚠ ", MedicalTheme::danger()),
            Span::styled(
                report.verdict(),
                MedicalTheme::danger().add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("✓ ", MedicalTheme::success()),
            Span::styled(
                report.verdict(),
                MedicalTheme::success().add_modifier(Modifier::BOLD),
            ),
        ])
    };
    f.render_widget(
        Paragraph::new(verdict)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let risk = report.result.risk_level;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::risk_level(risk))
        .percent(progress.shown.min(100))
        .label(format!("{}%", progress.shown));
    f.render_widget(gauge, chunks[1]);

    if !progress.is_done() {
        return;
    }

    let metric = Paragraph::new(Line::from(vec![
        Span::styled(format!("{}: ", report.metric_label()), MedicalTheme::text_secondary()),
        Span::styled(report.probability_text(), MedicalTheme::title()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(metric, chunks[2]);

    let risk_line = Paragraph::new(Line::from(vec![
        Span::styled("Risk Level: ", MedicalTheme::info()),
        Span::styled(
            format!("{} {}", risk.icon(), risk),
            MedicalTheme::risk_level(risk).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   (evaluated {})", report.evaluated_at.format("%H:%M:%S")),
            MedicalTheme::text_muted(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(risk_line, chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, disease: Disease, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("! Prediction for {disease} failed"),
            MedicalTheme::danger(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Ready { progress, .. } if !progress.is_done() => Line::from(vec![
            Span::styled("[any key] ", MedicalTheme::key_hint()),
            Span::styled("Skip animation", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back to form ", MedicalTheme::key_desc()),
            Span::styled("[H] ", MedicalTheme::key_hint()),
            Span::styled("Choose disease ", MedicalTheme::key_desc()),
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PredictionResult, RiskLevel};

    #[test]
    fn test_progress_at_is_monotonic_and_capped() {
        let mut previous = 0;
        for ms in (0..2000).step_by(7) {
            let value = progress_at(Duration::from_millis(ms), 73);
            assert!(value >= previous);
            assert!(value <= 73);
            previous = value;
        }
        assert_eq!(previous, 73);
        assert_eq!(progress_at(Duration::ZERO, 73), 0);
        assert_eq!(progress_at(Duration::from_millis(255), 73), 25);
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut animation = ProgressAnimation::start(42);
        animation.tick(animation.started_at + Duration::from_millis(100));
        assert_eq!(animation.shown, 10);
        assert!(!animation.is_done());

        animation.tick(animation.started_at + Duration::from_secs(5));
        assert_eq!(animation.shown, 42);
        assert!(animation.is_done());
    }

    #[test]
    fn test_skipping_animation_keeps_result() {
        let report = PredictionReport::new(Disease::Kidney, PredictionResult::new(1, 0.8123));
        let mut state = ResultState::ready(report.clone());

        assert!(state.skip_animation());
        assert!(!state.skip_animation());

        let shown = state.report().expect("report present");
        assert_eq!(shown.result, report.result);
        assert_eq!(shown.result.risk_level, RiskLevel::High);
        assert_eq!(shown.probability_text(), "81.23%");
        match state {
            ResultState::Ready { progress, .. } => assert_eq!(progress.shown, 81),
            _ => panic!("expected ready state"),
        }
    }

    #[test]
    fn test_zero_probability_needs_no_animation() {
        let report = PredictionReport::new(Disease::Liver, PredictionResult::new(0, 0.001));
        let mut state = ResultState::ready(report);
        assert!(!state.skip_animation());
    }
}
