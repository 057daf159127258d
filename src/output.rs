//! # Output Configuration
//!
//! Controls how command output looks: whether status lines carry emoji and
//! color, based on terminal capabilities and user preferences.
//!
//! The following are respected, in order:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depsnap::output::{Marker, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} libA@v1", config.marker(Marker::Created));
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

/// Kinds of status line printed by the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A new checkout was created.
    Created,
    /// An existing checkout was reset.
    Reset,
    /// Nothing to do.
    UpToDate,
    /// A dependency that a dry run would fetch.
    Planned,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The prefix for a status line of the given kind.
    pub fn marker(&self, marker: Marker) -> &'static str {
        let (emoji_str, plain) = match marker {
            Marker::Created => ("📦", "[NEW]"),
            Marker::Reset => ("🔄", "[RESET]"),
            Marker::UpToDate => ("✅", "[OK]"),
            Marker::Planned => ("🔎", "[PLAN]"),
        };
        emoji(self, emoji_str, plain)
    }

    /// Renders a package name, bold when colors are enabled.
    pub fn package(&self, package: &str) -> String {
        if self.use_color {
            style(package).bold().force_styling(true).to_string()
        } else {
            package.to_string()
        }
    }
}

/// Returns `emoji_str` when colors are enabled and `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
