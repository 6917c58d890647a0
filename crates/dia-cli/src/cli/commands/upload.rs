//! Document upload command.

use std::path::PathBuf;

use anyhow::{Result, bail};
use dia_core::api::ApiClient;
use dia_core::config::Config;
use dia_core::upload::partition_uploads;

pub async fn run(
    client: &ApiClient,
    config: &Config,
    files: &[PathBuf],
    session: Option<&str>,
) -> Result<()> {
    let plan = partition_uploads(files);
    for (path, reason) in &plan.skipped {
        eprintln!("Skipped {}: {reason}", path.display());
    }
    if plan.accepted.is_empty() {
        bail!("No uploadable files in the batch.");
    }

    let session_id = super::resolve_session(client, config, session).await?;

    // Sequential, and one failure never aborts the rest of the batch.
    let mut failures = 0usize;
    for path in &plan.accepted {
        match client.upload_file(&session_id, path).await {
            Ok(response) => {
                let summary = response
                    .message
                    .unwrap_or_else(|| format!("indexed {} chunk(s)", response.chunks_added));
                println!("{}: {summary}", path.display());
            }
            Err(error) => {
                failures += 1;
                eprintln!("Failed to upload {}: {error}", path.display());
            }
        }
    }

    if failures == plan.accepted.len() {
        bail!("All uploads failed.");
    }
    Ok(())
}
