//! Light and dark color schemes
//!
//! The selected scheme is stored in [`Config`](crate::Config); front ends
//! look up the palette for it when rendering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selected color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Named colors for one scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub text: &'static str,
    pub background: &'static str,
    pub icon: &'static str,
    pub button: &'static str,
    /// Label color on top of `button`
    pub button_text: &'static str,
    /// Color of completed todo titles
    pub completed: &'static str,
}

const LIGHT: Palette = Palette {
    text: "black",
    background: "#fff",
    icon: "black",
    button: "royalblue",
    button_text: "white",
    completed: "gray",
};

const DARK: Palette = Palette {
    text: "white",
    background: "black",
    icon: "red",
    button: "white",
    button_text: "black",
    completed: "gray",
};

impl ColorScheme {
    /// The other scheme
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            ColorScheme::Light => &LIGHT,
            ColorScheme::Dark => &DARK,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown scheme name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown color scheme '{0}'. Use 'light' or 'dark'.")]
pub struct UnknownColorScheme(pub String);

impl FromStr for ColorScheme {
    type Err = UnknownColorScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(UnknownColorScheme(s.to_string())),
        }
    }
}
