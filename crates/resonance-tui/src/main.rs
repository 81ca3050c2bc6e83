mod app;
mod handler;
mod tui;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use resonance_core::{Config, GeminiClient};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = init_logging()?;
    info!("Starting resonance v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not load config, using defaults");
        Config::new()
    });
    let api_key = config.resolve_api_key();
    let model = config.model().to_string();
    let client = GeminiClient::new(api_key.as_deref().unwrap_or_default()).with_model(&model);
    info!(model = %client.model(), "Gemini client initialized");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mode = config.mode.unwrap_or_default();
    let mut app = App::new(
        Arc::new(client),
        events.sender(),
        mode,
        &model,
        api_key.is_some(),
    );

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    info!("Shutting down");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

/// Log to a file; the terminal itself belongs to the UI.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = dirs::cache_dir()
        .map(|dir| dir.join("resonance"))
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(&log_dir, "resonance.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resonance=info,resonance_core=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}
