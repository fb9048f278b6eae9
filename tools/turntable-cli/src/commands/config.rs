//! Show or initialize the configuration file.

use std::path::PathBuf;

use turntable_common::config::{config_file_path, AppConfig};

pub fn run(config: AppConfig, path: Option<PathBuf>, init: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);

    if init {
        config
            .save_to(&path)
            .map_err(|e| anyhow::anyhow!("Failed to write config to {}: {e}", path.display()))?;
        println!("Configuration written to: {}", path.display());
        return Ok(());
    }

    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
