//! `[math]` section and math mode resolution.
//!
//! # Example
//!
//! ```toml
//! math_mode = "wp"          # "wp" = shortcode directive, "" = leave `$` untouched
//!
//! [math]
//! background = "ffffff"     # background color passed to the renderer
//! inline_scale = 2          # `s=` size for `$...$`
//! block_scale = 4           # `s=` size for `$$...$$`
//! ```

use serde::Deserialize;

use crate::error::{ConvertError, Result};

/// Name of the directive target accepted by `math_mode`.
pub const DIRECTIVE_MODE: &str = "wp";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// Background color (hex, no `#`).
    pub background: String,
    /// Render scale for inline formulas.
    pub inline_scale: u8,
    /// Render scale for block formulas.
    pub block_scale: u8,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            background: "ffffff".into(),
            inline_scale: 2,
            block_scale: 4,
        }
    }
}

/// Server-side math directive: `$latex <formula> &bg=<bg>&s=<scale> $`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathDirective {
    pub background: String,
    pub inline_scale: u8,
    pub block_scale: u8,
}

impl MathDirective {
    pub const PREFIX: &'static str = "$latex ";

    pub fn inline_suffix(&self) -> String {
        self.suffix(self.inline_scale)
    }

    pub fn block_suffix(&self) -> String {
        self.suffix(self.block_scale)
    }

    fn suffix(&self, scale: u8) -> String {
        format!(" &bg={}&s={} $", self.background, scale)
    }
}

impl Default for MathDirective {
    fn default() -> Self {
        Self::from(&MathConfig::default())
    }
}

impl From<&MathConfig> for MathDirective {
    fn from(config: &MathConfig) -> Self {
        Self {
            background: config.background.clone(),
            inline_scale: config.inline_scale,
            block_scale: config.block_scale,
        }
    }
}

/// How `$` / `$$` delimiters are treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathMode {
    /// Leave delimiters untouched.
    Disabled,
    /// Rewrite spans into the directive.
    Directive(MathDirective),
}

impl MathMode {
    /// Resolve the `math_mode` option. Unknown names are a configuration error.
    pub fn parse(name: &str, config: &MathConfig) -> Result<Self> {
        match name {
            "" => Ok(Self::Disabled),
            DIRECTIVE_MODE => Ok(Self::Directive(MathDirective::from(config))),
            other => Err(ConvertError::InvalidMathMode(other.to_string())),
        }
    }
}
