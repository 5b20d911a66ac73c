//! Display themes: glyphs and accent colour for the terminal pacer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Minimal,
    Focus,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Default, ThemeName::Minimal, ThemeName::Focus];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Minimal => "minimal",
            ThemeName::Focus => "focus",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeName::Default => Theme {
                accent: 36,
                bar_fill: '━',
                bar_empty: '─',
                dot: '●',
            },
            ThemeName::Minimal => Theme {
                accent: 37,
                bar_fill: '=',
                bar_empty: '-',
                dot: 'o',
            },
            ThemeName::Focus => Theme {
                accent: 35,
                bar_fill: '█',
                bar_empty: '░',
                dot: '◉',
            },
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("unknown theme '{s}' (expected default, minimal or focus)"),
            })
    }
}

/// Resolved glyph set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// ANSI SGR foreground code.
    pub accent: u8,
    pub bar_fill: char,
    pub bar_empty: char,
    pub dot: char,
}
