//! # Modes
//!
//! The active language/workflow selection. A `Mode` is the only thing that
//! decides which editor surfaces are visible and which runtime a run goes to.
//!
//! ```text
//! JavaScript  ─┐
//! TypeScript  ─┼─ single primary surface, executed
//! Python      ─┘
//! HtmlCss     ─── content + style surfaces, rendered into the preview
//! ```

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[value(name = "javascript")]
    JavaScript,
    /// Typed superset of JavaScript, transpiled before execution.
    #[value(name = "typescript")]
    TypeScript,
    Python,
    /// Dual-surface markup + style mode. Renders instead of executing.
    #[value(name = "htmlcss")]
    HtmlCss,
}

impl Mode {
    /// Every mode in select-control order.
    pub const ALL: [Mode; 4] = [Mode::JavaScript, Mode::TypeScript, Mode::Python, Mode::HtmlCss];

    /// Human-readable label for titles and notifications.
    pub fn label(self) -> &'static str {
        match self {
            Mode::JavaScript => "JavaScript",
            Mode::TypeScript => "TypeScript",
            Mode::Python => "Python",
            Mode::HtmlCss => "HTML + CSS",
        }
    }

    /// Stable lowercase key used in config files and env vars.
    pub fn key(self) -> &'static str {
        match self {
            Mode::JavaScript => "javascript",
            Mode::TypeScript => "typescript",
            Mode::Python => "python",
            Mode::HtmlCss => "htmlcss",
        }
    }

    /// Parse a config/env key. Case-insensitive.
    pub fn from_key(key: &str) -> Option<Mode> {
        let key = key.trim().to_ascii_lowercase();
        Mode::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Language tag handed to the primary surface. `None` for the dual-surface mode,
    /// whose two surfaces carry fixed tags.
    pub fn language_tag(self) -> Option<&'static str> {
        match self {
            Mode::JavaScript => Some("javascript"),
            Mode::TypeScript => Some("typescript"),
            Mode::Python => Some("python"),
            Mode::HtmlCss => None,
        }
    }

    pub fn is_dual_surface(self) -> bool {
        matches!(self, Mode::HtmlCss)
    }

    /// Next mode in select-control order, wrapping around.
    pub fn next(self) -> Mode {
        match self {
            Mode::JavaScript => Mode::TypeScript,
            Mode::TypeScript => Mode::Python,
            Mode::Python => Mode::HtmlCss,
            Mode::HtmlCss => Mode::JavaScript,
        }
    }

    /// Marker prefixed to error text in the output sink.
    pub fn error_marker(self) -> &'static str {
        match self {
            Mode::JavaScript => "❌ JavaScript error:\n",
            Mode::TypeScript => "❌ TypeScript error:\n",
            Mode::Python => "❌ Python error:\n",
            Mode::HtmlCss => "❌ HTML error:\n",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
