//! Medipredict: Multiple disease prediction in the terminal
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medipredict::adapters::sanitize::SanitizingMakeWriter;
use medipredict::tui::App;

fn main() -> Result<()> {
    // Initialize logging.
    //
    // Writing logs to the terminal would corrupt the TUI (alternate screen),
    // so an interactive session logs to a file unless told otherwise.
    let log_mode = std::env::var("MEDIPREDICT_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file = std::env::var("MEDIPREDICT_LOG_FILE")
            .unwrap_or_else(|_| "medipredict.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // A missing directory surfaces as an open error below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Medipredict...");

    let mut app = App::new()?;
    app.run()?;

    tracing::info!("Medipredict shutdown complete.");
    Ok(())
}
