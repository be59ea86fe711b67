//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use ticklist_core::storage::validate_key;
use ticklist_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "storage_key": config.storage_key,
                    "color_scheme": config.color_scheme,
                    "seed_defaults": config.seed_defaults,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:      {}", config.data_dir.display());
            println!("  storage_key:   {}", config.storage_key);
            println!("  color_scheme:  {}", config.color_scheme);
            println!("  seed_defaults: {}", config.seed_defaults);
            println!(
                "  log_file:      {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "storage_key" => {
            validate_key(&value).context("Invalid value for storage_key")?;
            config.storage_key = value.clone();
        }
        "color_scheme" => {
            config.color_scheme = value
                .parse()
                .context("Invalid value for color_scheme")?;
        }
        "seed_defaults" => {
            config.seed_defaults = value
                .parse()
                .context("Invalid value for seed_defaults. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, storage_key, color_scheme, seed_defaults, log_file",
                key
            );
        }
    }

    save(&config, config_path)?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Save to the CLI-specified path or default
pub fn save(config: &Config, config_path: Option<&PathBuf>) -> Result<()> {
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")
}
