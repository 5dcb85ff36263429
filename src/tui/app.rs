//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Result gauge animation, driven by the event loop tick

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::artifact::ModelArtifact;
use crate::application::{ModelStore, PredictionService};
use crate::domain::Disease;
use crate::ports::Classifier;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    form::{render_form, FormState},
    render_footer,
    result::{render_result, ResultState},
};

/// Environment variable naming the model artifact directory.
pub const MODEL_DIR_ENV: &str = "MEDIPREDICT_MODEL_DIR";

const DEFAULT_MODEL_DIR: &str = "models";

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Form,
    Result,
}

/// Main application state
pub struct App<C: Classifier = ModelArtifact> {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    service: PredictionService<C>,

    dashboard_state: DashboardState,

    /// Disease whose form is open
    active: Disease,

    /// One form per disease, kept across navigation
    forms: Vec<FormState>,

    result_state: ResultState,
}

impl App<ModelArtifact> {
    /// Create a new application instance loading models from the
    /// configured directory.
    ///
    /// # Errors
    /// Returns error if the model directory is missing or any model fails
    /// to load.
    pub fn new() -> Result<Self> {
        let model_path =
            std::env::var(MODEL_DIR_ENV).unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string());
        let model_dir = Path::new(&model_path);

        if !model_dir.is_dir() {
            return Err(crate::MedipredictError::Config(format!(
                "Model directory not found at {model_dir:?}. Set {MODEL_DIR_ENV} to a directory containing the disease model artifacts."
            ))
            .into());
        }

        // Refuse to start without all three models.
        let store = ModelStore::load(model_dir)
            .map_err(|e| anyhow!("Failed to load models from {:?}: {}", model_dir, e))?;

        Ok(Self::with_dependencies(
            PredictionService::new(Arc::new(store)),
            model_path,
        ))
    }
}

impl<C: Classifier> App<C> {
    /// Create application with an injected prediction service.
    pub fn with_dependencies(service: PredictionService<C>, model_dir: impl Into<String>) -> Self {
        let dashboard_state = DashboardState {
            selected: 0,
            model_dir: model_dir.into(),
            manifest_verified: service.store().manifest_verified(),
        };

        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            dashboard_state,
            active: Disease::Kidney,
            forms: Disease::ALL
                .iter()
                .map(|d| FormState::new(d.profile()))
                .collect(),
            result_state: ResultState::Idle,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.result_state.tick(Instant::now());

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::Form => render_form(f, chunks[0], self.form()),
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                }

                render_footer(f, chunks[1]);
            })?;

            // Short poll keeps the gauge animation smooth
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn form(&self) -> &FormState {
        &self.forms[form_index(self.active)]
    }

    fn form_mut(&mut self) -> &mut FormState {
        &mut self.forms[form_index(self.active)]
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL) && matches!(key, KeyCode::Char('q' | 'c')) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.dashboard_state.prev(),
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => self.dashboard_state.next(),
            KeyCode::Enter => {
                self.active = self.dashboard_state.selected_disease();
                self.screen = Screen::Form;
            }
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.form_mut().prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_mut().next_field(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => self.form_mut().toggle_option(),
            KeyCode::Char('r' | 'R') => self.form_mut().reset_all(),
            KeyCode::Char(c) => self.form_mut().input_char(c),
            KeyCode::Backspace => self.form_mut().delete_char(),
            KeyCode::Delete => self.form_mut().reset_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        if self.result_state.skip_animation() {
            return;
        }

        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.screen = Screen::Form;
            }
            KeyCode::Char('h' | 'H' | 'n' | 'N') => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Char('q' | 'Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let disease = self.active;
        let vector = match self.form_mut().to_feature_vector() {
            Ok(vector) => vector,
            Err(e) => {
                self.form_mut().error_message = Some(e.to_string());
                return;
            }
        };

        self.result_state = match self.service.predict_vector(&vector) {
            Ok(report) => ResultState::ready(report),
            Err(e) => {
                tracing::error!("Prediction failed for {}: {}", disease, e);
                ResultState::Error {
                    disease,
                    message: e.to_string(),
                }
            }
        };
        self.screen = Screen::Result;
    }
}

fn form_index(disease: Disease) -> usize {
    match disease {
        Disease::Kidney => 0,
        Disease::Liver => 1,
        Disease::Parkinsons => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, RiskLevel};
    use crate::ports::ModelError;

    /// Logistic-free stub: probability is the first feature divided by 100.
    struct FirstFeatureClassifier {
        n_features: usize,
        fail: bool,
    }

    impl Classifier for FirstFeatureClassifier {
        fn n_features(&self) -> usize {
            self.n_features
        }

        fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
            Ok(u8::from(self.predict_probability(features)? > 0.5))
        }

        fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
            if self.fail {
                return Err(ModelError::InvalidArtifact {
                    path: "stub".to_string(),
                    message: "scoring failed".to_string(),
                });
            }
            if features.len() != self.n_features {
                return Err(ModelError::FeatureCount {
                    expected: self.n_features,
                    got: features.len(),
                });
            }
            Ok((features[0] / 100.0).clamp(0.0, 1.0))
        }
    }

    fn app_with(fail_liver: bool) -> App<FirstFeatureClassifier> {
        let stub = |disease: Disease, fail: bool| FirstFeatureClassifier {
            n_features: disease.profile().field_count(),
            fail,
        };
        let store = ModelStore::from_classifiers(
            stub(Disease::Kidney, false),
            stub(Disease::Liver, fail_liver),
            stub(Disease::Parkinsons, false),
        )
        .expect("store");
        App::with_dependencies(PredictionService::new(Arc::new(store)), "models")
    }

    fn press(app: &mut App<FirstFeatureClassifier>, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key, KeyModifiers::NONE);
        }
    }

    fn type_text(app: &mut App<FirstFeatureClassifier>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_submit_kidney_form_shows_result() {
        let mut app = app_with(false);
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.screen(), Screen::Form);

        // age
        press(&mut app, &[KeyCode::Backspace, KeyCode::Backspace]);
        type_text(&mut app, "75");
        press(&mut app, &[KeyCode::Enter]);

        assert_eq!(app.screen(), Screen::Result);
        let report = app.result_state.report().expect("report").clone();
        assert_eq!(report.disease, Disease::Kidney);
        assert_eq!(report.result.label, 1);
        assert_eq!(report.result.risk_level, RiskLevel::High);
        assert_eq!(report.probability_text(), "75.00%");
    }

    #[test]
    fn test_any_key_skips_animation_before_navigation() {
        let mut app = app_with(false);
        press(&mut app, &[KeyCode::Enter, KeyCode::Enter]);
        assert_eq!(app.screen(), Screen::Result);

        // First key only finishes the gauge
        press(&mut app, &[KeyCode::Char('x')]);
        assert_eq!(app.screen(), Screen::Result);
        assert!(!app.result_state.skip_animation());

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.screen(), Screen::Form);
    }

    #[test]
    fn test_forms_keep_values_per_disease() {
        let mut app = app_with(false);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.active, Disease::Liver);

        // Liver gender toggles to Female
        press(&mut app, &[KeyCode::Down, KeyCode::Right, KeyCode::Esc]);
        assert_eq!(app.screen(), Screen::Dashboard);

        press(&mut app, &[KeyCode::Up, KeyCode::Enter]);
        assert_eq!(app.active, Disease::Kidney);
        assert_eq!(
            app.form().controls[0].value,
            Disease::Kidney.profile().defaults()[0]
        );

        press(&mut app, &[KeyCode::Esc, KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.active, Disease::Liver);
        assert_eq!(app.form().controls[1].value, FieldValue::Choice(1));

        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.form().controls[1].value, FieldValue::Choice(0));
    }

    #[test]
    fn test_classifier_failure_shows_error() {
        let mut app = app_with(true);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Enter]);

        assert_eq!(app.screen(), Screen::Result);
        match &app.result_state {
            ResultState::Error { disease, message } => {
                assert_eq!(*disease, Disease::Liver);
                assert!(message.contains("scoring failed"));
            }
            other => panic!("expected error state, got {other:?}"),
        }

        press(&mut app, &[KeyCode::Char('h')]);
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(false);
        press(&mut app, &[KeyCode::Enter]);
        type_text(&mut app, "q");
        assert!(!app.should_quit());

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit());

        let mut app = app_with(false);
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_quit());
    }
}
