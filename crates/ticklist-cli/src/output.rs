//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output, styled with the configured color scheme
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::io::IsTerminal;

use anyhow::Result;
use crossterm::style::{Color, Stylize};
use ticklist_core::{ColorScheme, Palette, Todo};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
    palette: &'static Palette,
    styled: bool,
}

impl Output {
    pub fn new(format: OutputFormat, scheme: ColorScheme) -> Self {
        Self {
            format,
            palette: scheme.palette(),
            styled: std::io::stdout().is_terminal(),
        }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single todo with all fields
    pub fn print_todo(&self, todo: &Todo) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", todo.id);
                println!("Title:     {}", todo.title);
                println!(
                    "Status:    {}",
                    if todo.completed { "done" } else { "open" }
                );
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(todo)?);
            }
            OutputFormat::Quiet => {
                println!("{}", todo.id);
            }
        }
        Ok(())
    }

    /// Print the list in display order
    pub fn print_todos(&self, todos: &[Todo]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if todos.is_empty() {
                    println!("Nothing to do.");
                    return Ok(());
                }
                let width = todos
                    .iter()
                    .map(|t| t.id.to_string().len())
                    .max()
                    .unwrap_or(1);
                for todo in todos {
                    println!("{}", self.todo_line(todo, width));
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(todos)?);
            }
            OutputFormat::Quiet => {
                for todo in todos {
                    println!("{}", todo.id);
                }
            }
        }
        Ok(())
    }

    fn todo_line(&self, todo: &Todo, width: usize) -> String {
        let mark = if todo.completed { "[x]" } else { "[ ]" };
        let id = format!("{:>width$}", todo.id, width = width);

        if !self.styled {
            return format!("{} {}  {}", mark, id, todo.title);
        }

        let id = id.with(palette_color(self.palette.button));
        if todo.completed {
            let title = todo
                .title
                .as_str()
                .crossed_out()
                .with(palette_color(self.palette.completed));
            format!("{} {}  {}", mark, id, title)
        } else {
            format!("{} {}  {}", mark, id, todo.title)
        }
    }

    /// Print the color names for a scheme
    pub fn print_palette(&self, scheme: ColorScheme) -> Result<()> {
        let palette = scheme.palette();
        match self.format {
            OutputFormat::Human => {
                println!("Color scheme: {}", scheme);
                let rows = [
                    ("text", palette.text),
                    ("background", palette.background),
                    ("icon", palette.icon),
                    ("button", palette.button),
                    ("button_text", palette.button_text),
                    ("completed", palette.completed),
                ];
                for (name, value) in rows {
                    if self.styled {
                        println!("  {:<12} {}", name, value.with(palette_color(value)));
                    } else {
                        println!("  {:<12} {}", name, value);
                    }
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "color_scheme": scheme,
                        "palette": palette,
                    }))?
                );
            }
            OutputFormat::Quiet => {
                println!("{}", scheme);
            }
        }
        Ok(())
    }

    /// Print success message (not in quiet mode)
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"status": "ok", "message": message}))
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message for an ignored request (not in quiet mode)
    pub fn unchanged(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "unchanged", "message": message})
                )
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (not in quiet mode)
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }
}

/// Map a palette color name to a terminal color
pub fn palette_color(name: &str) -> Color {
    match name {
        "black" => Color::Black,
        "white" | "#fff" | "#ffffff" => Color::White,
        "red" => Color::Red,
        "gray" | "grey" => Color::Grey,
        "royalblue" => Color::Rgb {
            r: 65,
            g: 105,
            b: 225,
        },
        hex => parse_hex(hex).unwrap_or(Color::Reset),
    }
}

fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}
