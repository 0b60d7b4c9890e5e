//! Renderer collaborator.
//!
//! Turning a [`Notebook`] into HTML is out of this crate's hands; callers
//! plug in whatever renderer they use (nbconvert output, a custom exporter,
//! ...). The pipeline only post-processes the result.

use anyhow::Result;

use crate::config::Template;
use crate::notebook::Notebook;

/// Output of a renderer: raw HTML plus the CSS blocks it generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Stylesheets in cascade order. Empty when none were generated.
    pub css: Vec<String>,
}

impl Rendered {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: Vec::new(),
        }
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css.push(css.into());
        self
    }

    /// All CSS joined into one stylesheet, `None` if nothing was generated.
    pub fn stylesheet(&self) -> Option<String> {
        if self.css.iter().all(|block| block.trim().is_empty()) {
            return None;
        }
        let mut joined = self.css.join("\n");
        joined.push('\n');
        Some(joined)
    }
}

/// Renders a notebook into an HTML/CSS pair.
pub trait Renderer {
    fn render(&self, notebook: &Notebook, template: &Template) -> Result<Rendered>;
}
