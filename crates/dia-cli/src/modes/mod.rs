//! Runtime execution modes.
//!
//! - one-shot subcommands: plain stdout/stderr
//! - `tui`: full-screen interactive terminal UI (optional feature)

#[cfg(feature = "tui")]
pub use dia_tui::run_tui;

#[cfg(not(feature = "tui"))]
pub async fn run_tui(_config: &dia_core::config::Config, _base_url: String) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
