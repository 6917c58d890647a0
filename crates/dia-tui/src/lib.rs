//! Full-screen TUI for the dia terminal client.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use dia_core::config::Config;
pub use features::{input, session, transcript};
pub use runtime::TuiRuntime;

use crate::effects::UiEffect;
use crate::transcript::HistoryCell;

/// Runs the interactive analyzer session.
pub async fn run_tui(config: &Config, base_url: String) -> Result<()> {
    // The TUI needs a terminal to render into.
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Use `dia ask '...'` for non-interactive queries."
        );
    }

    // Pre-TUI info goes to stderr; the alternate screen replaces it.
    let mut err = stderr();
    writeln!(err, "dia - Domain Intelligence Analyzer")?;
    writeln!(err, "Backend: {base_url}")?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(config.clone(), base_url)?;

    let config_path = dia_core::config::paths::config_path();
    if config_path.exists() {
        let message = format!("Config file: {}", config_path.display());
        runtime
            .state
            .tui
            .transcript
            .push_cell(HistoryCell::system(message));
    }
    runtime.state.tui.transcript.push_cell(HistoryCell::system(
        "Loading sessions... (/ or Ctrl+P for commands)",
    ));

    // Seed the session list and probe the backend quietly; the status
    // border fills in provider and model when the probe answers.
    runtime.run(vec![
        UiEffect::RefreshSessions,
        UiEffect::LoadBackendStatus { announce: false },
    ])?;

    // Terminal restored by this point.
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
