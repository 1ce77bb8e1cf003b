//! # Output Styling
//!
//! Decides whether terminal output is colored and provides the styles used by
//! the summary and the progress lines.
//!
//! The decision is made once, stored in an [`OutputConfig`] value, and passed
//! to whatever renders text. Nothing here reads or writes process-wide color
//! state, so two renderers with different settings can coexist (tests rely on
//! this).
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::fmt::Display;

use console::Style;

/// Output configuration for controlling colors and icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Build from the value of the `--color` flag (`always`, `never`, `auto`).
    ///
    /// In auto mode colors are disabled when `NO_COLOR` is set, `CLICOLOR=0`,
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

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    pub fn palette(self) -> Palette {
        Palette::new(self)
    }
}

/// Text styles for one output configuration.
///
/// With colors off every method returns the text unchanged and icons fall
/// back to plain ASCII markers.
#[derive(Debug, Clone)]
pub struct Palette {
    config: OutputConfig,
    success: Style,
    error: Style,
    warning: Style,
    info: Style,
    dim: Style,
    bold: Style,
}

impl Palette {
    pub fn new(config: OutputConfig) -> Self {
        // Forced so the console crate's global detection is never consulted.
        let base = || Style::new().force_styling(true);
        Self {
            config,
            success: base().green().bold(),
            error: base().red().bold(),
            warning: base().yellow().bold(),
            info: base().blue().bold(),
            dim: base().dim(),
            bold: base().white().bold(),
        }
    }

    pub fn plain() -> Self {
        Self::new(OutputConfig::without_color())
    }

    fn paint(&self, style: &Style, text: impl Display) -> String {
        if self.config.use_color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: impl Display) -> String {
        self.paint(&self.success, text)
    }

    pub fn error(&self, text: impl Display) -> String {
        self.paint(&self.error, text)
    }

    pub fn warning(&self, text: impl Display) -> String {
        self.paint(&self.warning, text)
    }

    pub fn info(&self, text: impl Display) -> String {
        self.paint(&self.info, text)
    }

    pub fn dim(&self, text: impl Display) -> String {
        self.paint(&self.dim, text)
    }

    pub fn bold(&self, text: impl Display) -> String {
        self.paint(&self.bold, text)
    }

    pub fn success_icon(&self) -> String {
        self.success(self.icon("✓", "[ok]"))
    }

    pub fn error_icon(&self) -> String {
        self.error(self.icon("✗", "[x]"))
    }

    pub fn warning_icon(&self) -> String {
        self.warning(self.icon("⚠", "[!]"))
    }

    pub fn info_icon(&self) -> String {
        self.info(self.icon("ℹ", "[i]"))
    }

    fn icon<'a>(&self, fancy: &'a str, plain: &'a str) -> &'a str {
        if self.config.use_color {
            fancy
        } else {
            plain
        }
    }
}
