//! One-shot command handlers.
//!
//! Each module handles one subcommand family: plain stdout output,
//! errors propagated as anyhow chains for `main` to print.

pub mod analyze;
pub mod ask;
pub mod config;
pub mod load_model;
pub mod sessions;
pub mod status;
pub mod upload;

use anyhow::{Context, Result};
use dia_core::api::ApiClient;
use dia_core::config::Config;

/// Picks the session a one-shot command operates on: an explicit
/// `--session` id wins; otherwise the first listed session; otherwise a
/// fresh session created with the configured defaults.
pub(crate) async fn resolve_session(
    client: &ApiClient,
    config: &Config,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(id) = explicit {
        return Ok(id.to_string());
    }

    let sessions = client.sessions().await.context("list sessions")?;
    if let Some(first) = sessions.first() {
        return Ok(first.id.clone());
    }

    let created = client
        .initialize(&config.session_name, config.provider.id())
        .await
        .context("create session")?;
    eprintln!("Created session {}", created.session_id);
    Ok(created.session_id)
}
