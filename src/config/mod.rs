//! Conversion options.
//!
//! [`Options`] is the user-facing configuration bundle (deserializable from
//! TOML); [`Settings`] is the validated form a run actually uses.
//!
//! # Example
//!
//! ```toml
//! output_dir = "out/post"       # default: notebook basename
//! template = "full"             # template name or path to a template file
//! css_file = "style.css"        # "" = use the CSS produced by the renderer
//! save_images = true
//! image_dir = "img"             # relative to output_dir, or absolute
//! image_url_prefix = "https://example.com/img"
//! math_mode = "wp"
//! strip_attributes = true
//! save_css = false              # dump style.css into output_dir
//! save_html = false             # dump input.html into output_dir
//! quiet = false
//! ```

mod math;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{ConvertError, Result};

pub use math::{DIRECTIVE_MODE, MathConfig, MathDirective, MathMode};

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Output directory. `None` = notebook basename.
    #[serde(deserialize_with = "empty_as_none")]
    pub output_dir: Option<PathBuf>,
    /// Template name (e.g. `full`, `basic`) or template file path.
    pub template: String,
    /// Stylesheet to inline. `None` = CSS generated by the renderer.
    #[serde(deserialize_with = "empty_as_none")]
    pub css_file: Option<PathBuf>,
    /// Write embedded/local images to files.
    pub save_images: bool,
    /// Image directory, relative to `output_dir` unless absolute.
    pub image_dir: PathBuf,
    /// Image URL root as seen from HTTP.
    pub image_url_prefix: String,
    /// `"wp"` or `""`.
    pub math_mode: String,
    pub math: MathConfig,
    /// Remove `class` and `id` attributes.
    pub strip_attributes: bool,
    /// Dump the normalized CSS to `style.css`.
    pub save_css: bool,
    /// Dump the pre-cleaned HTML to `input.html`.
    pub save_html: bool,
    pub quiet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_dir: None,
            template: "full".into(),
            css_file: Some(PathBuf::from("style.css")),
            save_images: true,
            image_dir: PathBuf::from("img"),
            image_url_prefix: "img".into(),
            math_mode: DIRECTIVE_MODE.into(),
            math: MathConfig::default(),
            strip_attributes: true,
            save_css: false,
            save_html: false,
            quiet: false,
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = Option::<PathBuf>::deserialize(deserializer)?;
    Ok(path.filter(|p| !p.as_os_str().is_empty()))
}

impl Options {
    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Validate and resolve against a notebook path.
    ///
    /// Configuration errors surface here, before anything is written.
    pub fn resolve(&self, notebook: &Path) -> Result<Settings> {
        let math = MathMode::parse(&self.math_mode, &self.math)?;

        let stem = notebook
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notebook".into());
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&stem));
        let source_dir = notebook
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let images = self.save_images.then(|| ImageSettings {
            // `join` keeps absolute image dirs as they are
            dir: output_dir.join(&self.image_dir),
            url_prefix: self.image_url_prefix.trim_end_matches('/').to_string(),
            source_dir: source_dir.clone(),
        });

        Ok(Settings {
            stem,
            output_dir,
            template: Template::parse(&self.template),
            css_file: self.css_file.clone(),
            images,
            math,
            strip_attributes: self.strip_attributes,
            save_css: self.save_css,
            save_html: self.save_html,
        })
    }
}

// ============================================================================
// Template
// ============================================================================

/// Renderer template selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Built-in template name understood by the renderer.
    Named(String),
    /// Custom template file.
    File(PathBuf),
}

impl Template {
    const FILE_EXTENSIONS: &'static [&'static str] = &[".tpl", ".j2", ".jinja", ".jinja2"];

    pub fn parse(value: &str) -> Self {
        let is_file = value.contains(['/', '\\'])
            || Self::FILE_EXTENSIONS
                .iter()
                .any(|ext| value.to_ascii_lowercase().ends_with(ext));
        if is_file {
            Self::File(PathBuf::from(value))
        } else {
            Self::Named(value.to_string())
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::Named("full".into())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Where and how images are externalized.
#[derive(Debug, Clone)]
pub struct ImageSettings {
    /// Asset directory on disk.
    pub dir: PathBuf,
    /// URL prefix without trailing slash.
    pub url_prefix: String,
    /// Base for relative local image paths (the notebook's directory).
    pub source_dir: PathBuf,
}

/// Validated options for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Notebook file name without extension.
    pub stem: String,
    pub output_dir: PathBuf,
    pub template: Template,
    pub css_file: Option<PathBuf>,
    /// `None` when image externalization is disabled.
    pub images: Option<ImageSettings>,
    pub math: MathMode,
    pub strip_attributes: bool,
    pub save_css: bool,
    pub save_html: bool,
}
