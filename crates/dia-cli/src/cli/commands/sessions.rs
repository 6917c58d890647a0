//! Session command handlers.

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use dia_core::api::ApiClient;
use dia_core::config::ProviderKind;

pub async fn list(client: &ApiClient) -> Result<()> {
    let sessions = client.sessions().await.context("list sessions")?;
    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["ID", "Name"]);
    for session in sessions {
        table.add_row([session.id, session.name]);
    }
    println!("{table}");
    Ok(())
}

pub async fn new(client: &ApiClient, name: &str, provider: ProviderKind) -> Result<()> {
    let created = client
        .initialize(name, provider.id())
        .await
        .context("create session")?;
    println!("Created session {} ({})", created.session_id, name);
    if let Some(message) = created.message {
        println!("{message}");
    }
    Ok(())
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    let message = client
        .delete_session(id)
        .await
        .with_context(|| format!("delete session '{id}'"))?;
    println!("{message}");
    Ok(())
}

pub async fn rename(client: &ApiClient, id: &str, name: &str) -> Result<()> {
    let message = client
        .rename_session(id, name)
        .await
        .with_context(|| format!("rename session '{id}'"))?;
    println!("{message}");
    Ok(())
}
