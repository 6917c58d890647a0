//! Domain and URL analysis commands.

use anyhow::{Context, Result};
use dia_core::api::ApiClient;
use dia_core::config::Config;

pub async fn domain(
    client: &ApiClient,
    config: &Config,
    domain: &str,
    session: Option<&str>,
) -> Result<()> {
    let session_id = super::resolve_session(client, config, session).await?;
    let content = client
        .analyze_domain(&session_id, domain)
        .await
        .with_context(|| format!("analyze domain '{domain}'"))?;
    println!("{content}");
    Ok(())
}

pub async fn urls(
    client: &ApiClient,
    config: &Config,
    urls: &[String],
    session: Option<&str>,
) -> Result<()> {
    let session_id = super::resolve_session(client, config, session).await?;
    let content = client
        .analyze_urls(&session_id, urls)
        .await
        .context("analyze urls")?;
    println!("{content}");
    Ok(())
}
