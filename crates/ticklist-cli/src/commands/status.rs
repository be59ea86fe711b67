//! Status command handler

use anyhow::Result;

use ticklist_core::{Config, FileStore, TodoStore};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &TodoStore<FileStore>, config: &Config, output: &Output) -> Result<()> {
    let provider = store.provider();
    let location = provider.path_for(store.key())?;
    let stats = provider.stats(store.key())?;
    let total = store.todos().len();
    let completed = store.working_set().completed_count();
    let load_error = store.load_error().map(|e| e.to_string());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "storage_key": store.key(),
                    "location": location,
                    "storage": {
                        "exists": stats.exists,
                        "size": stats.size,
                    },
                    "counts": {
                        "total": total,
                        "completed": completed,
                        "open": total - completed,
                    },
                    "color_scheme": config.color_scheme,
                    "seed_defaults": config.seed_defaults,
                    "load_error": load_error,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", total);
        }
        OutputFormat::Human => {
            println!("Ticklist Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Key:      {}", store.key());
            println!("  Location: {}", location.display());
            if stats.exists {
                println!("  Size:     {}", stats.size_human());
            } else {
                println!("  Size:     (nothing saved yet)");
            }
            println!();
            println!("Contents:");
            println!("  Todos:     {}", total);
            println!("  Completed: {}", completed);
            println!("  Open:      {}", total - completed);
            println!();
            println!("Theme: {}", config.color_scheme);
            if let Some(err) = load_error {
                println!();
                println!("Last load failed: {}", err);
            }
        }
    }

    Ok(())
}
