use anyhow::{Context, Result};
use shared::OwlClient;

/// Creates the database every workspace lives in.
pub async fn init(client: &OwlClient) -> Result<()> {
    client
        .create_database()
        .await
        .context("failed to create the database")?;
    println!("Created database {}", client.paths().database());
    Ok(())
}
