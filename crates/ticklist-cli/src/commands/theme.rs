//! Theme command handlers

use std::path::PathBuf;

use anyhow::Result;

use ticklist_core::{ColorScheme, Config};

use crate::commands::config::save;
use crate::output::Output;

/// Show the active scheme and its palette
pub fn show(config: &Config, output: &Output) -> Result<()> {
    output.print_palette(config.color_scheme)
}

/// Switch to `scheme`, or to the other scheme when `None`
pub fn set(
    config: &mut Config,
    scheme: Option<ColorScheme>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let next = scheme.unwrap_or_else(|| config.color_scheme.toggle());

    if next == config.color_scheme {
        output.unchanged(&format!("Color scheme is already {}.", next));
        return Ok(());
    }

    config.color_scheme = next;
    save(config, config_path)?;
    output.success(&format!("Color scheme set to {}", next));
    Ok(())
}
