//! Ticklist CLI
//!
//! Command-line front end for the Ticklist todo store. Each invocation opens
//! the store, applies at most one change, and waits for it to be saved.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticklist_core::{ColorScheme, Config, TodoId, TodoStore};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "ticklist")]
#[command(about = "Ticklist - a local todo list")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all todos (default)
    #[command(alias = "ls")]
    List,
    /// Add a todo
    #[command(alias = "create")]
    Add {
        /// Title words, joined with spaces
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },
    /// Mark a todo done, or open again
    Toggle {
        /// Todo ID
        id: TodoId,
    },
    /// Delete a todo
    #[command(alias = "rm")]
    Delete {
        /// Todo ID
        id: TodoId,
    },
    /// Show a single todo
    Show {
        /// Todo ID
        id: TodoId,
    },
    /// Edit a todo's title or status
    Edit {
        /// Todo ID
        id: TodoId,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Mark as done
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        /// Mark as open
        #[arg(long)]
        undone: bool,
    },
    /// Show status (storage location, counts)
    Status,
    /// Show or switch the color scheme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeCommands {
    /// Show the active scheme and palette
    Show,
    /// Switch between light and dark
    Toggle,
    /// Use the light scheme
    Light,
    /// Use the dark scheme
    Dark,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, storage_key, color_scheme, seed_defaults, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = OutputFormat::from_flags(cli.json, cli.quiet);
    let config_path = cli.config.as_ref();

    // Config commands must work even when the config file is broken
    if let Some(Commands::Config { command }) = &cli.command {
        let output = Output::new(format, ColorScheme::default());
        return handle_config_command(command.clone(), config_path, &output);
    }

    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);
    let output = Output::new(format, config.color_scheme);

    if let Some(Commands::Theme { command }) = &cli.command {
        return handle_theme_command(*command, &mut config, config_path, &output);
    }

    let mut store = TodoStore::open_with_config(&config).await;
    if let Some(err) = store.load_error() {
        output.warn(&format!("Could not load saved todos: {}", err));
        if let Some(hint) = err.recovery_suggestion() {
            output.warn(hint);
        }
    }

    let result = match cli.command.unwrap_or(Commands::List) {
        Commands::List => commands::todo::list(&store, &output),
        Commands::Add { title } => commands::todo::add(&mut store, title, &output),
        Commands::Toggle { id } => commands::todo::toggle(&mut store, id, &output),
        Commands::Delete { id } => commands::todo::delete(&mut store, id, &output),
        Commands::Show { id } => commands::todo::show(&store, id, &output),
        Commands::Edit {
            id,
            title,
            done,
            undone,
        } => {
            let completed = match (done, undone) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::todo::edit(&mut store, id, title, completed, &output)
        }
        Commands::Status => commands::status::show(&store, &config, &output),
        // Handled above
        Commands::Theme { .. } | Commands::Config { .. } => Ok(()),
    };

    // The working set stays authoritative; a failed save is only reported
    if let Err(e) = store.close().await {
        output.warn(&format!("Changes were not saved: {}", e));
        if let Some(hint) = e.recovery_suggestion() {
            output.warn(hint);
        }
    }

    result
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

fn handle_theme_command(
    command: Option<ThemeCommands>,
    config: &mut Config,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ThemeCommands::Show) | None => commands::theme::show(config, output),
        Some(ThemeCommands::Toggle) => commands::theme::set(config, None, config_path, output),
        Some(ThemeCommands::Light) => {
            commands::theme::set(config, Some(ColorScheme::Light), config_path, output)
        }
        Some(ThemeCommands::Dark) => {
            commands::theme::set(config, Some(ColorScheme::Dark), config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if TICKLIST_LOG environment variable is set.
/// Logs to config.log_file when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TICKLIST_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "ticklist_core={},ticklist_cli={}",
        log_level, log_level
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match config.log_file {
        Some(ref log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };

            // Ignore error if already initialized
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();
            info!("Logging to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
