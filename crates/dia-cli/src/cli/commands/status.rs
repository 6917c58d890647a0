//! Backend status command.

use anyhow::{Context, Result};
use dia_core::api::ApiClient;

/// Prints the backend's status report verbatim, pretty-printed.
pub async fn run(client: &ApiClient) -> Result<()> {
    let status = client.status().await.context("backend status")?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
