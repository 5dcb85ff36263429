//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Choosing the disease to screen for
//! - Filling in the disease-specific form
//! - Reading the verdict, probability and risk tier

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
