use std::fs;

use anyhow::{Context, Result, bail};
use shared::config::Config;

/// Writes a configuration file with default values in the current directory.
///
/// # Arguments
/// * `format` - The format of the configuration file ("yaml" or "json").
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str) -> Result<()> {
    let config = Config::with_defaults();
    let (file_name, serialized) = match format {
        "yaml" => ("owlchat.yaml", config.to_yaml()?),
        "json" => ("owlchat.json", config.to_json()?),
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    };

    fs::write(file_name, serialized.as_bytes())
        .with_context(|| format!("failed to write {file_name}"))?;
    println!("Configuration file '{file_name}' generated successfully.");
    Ok(())
}
