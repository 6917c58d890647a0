//! One-shot chat.

use anyhow::{Context, Result, bail};
use dia_core::api::{ApiClient, ChatType};
use dia_core::config::Config;

pub async fn run(
    client: &ApiClient,
    config: &Config,
    message: &str,
    session: Option<&str>,
) -> Result<()> {
    if message.is_empty() {
        bail!("Nothing to ask: the message is empty.");
    }

    let session_id = super::resolve_session(client, config, session).await?;

    // Sessions with indexed chunks route to document search; a failed
    // probe falls back to automatic routing.
    let chat_type = match client.document_status(&session_id).await {
        Ok(status) if status.total_chunks > 0 => ChatType::Document,
        Ok(_) => ChatType::Auto,
        Err(error) => {
            tracing::warn!(%session_id, error = %error, "document status lookup failed");
            ChatType::Auto
        }
    };

    let response = client
        .chat(&session_id, message, chat_type)
        .await
        .context("chat request")?;

    println!("{}", response.response);
    let sources = response.source_labels();
    if !sources.is_empty() {
        println!();
        println!("Sources:");
        for source in sources {
            println!("  - {source}");
        }
    }
    Ok(())
}
