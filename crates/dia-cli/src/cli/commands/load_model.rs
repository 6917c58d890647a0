//! Manual model load command.

use anyhow::{Context, Result};
use dia_core::api::ApiClient;

pub async fn run(client: &ApiClient) -> Result<()> {
    let message = client.load_model().await.context("load model")?;
    println!("{message}");
    Ok(())
}
