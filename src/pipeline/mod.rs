//! Notebook to blog-safe HTML conversion.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ resolve options (fails before anything is written)        │
//! ├───────────────────────────────────────────────────────────┤
//! │ read notebook -> render -> pick CSS                       │
//! ├───────────────────────────────────────────────────────────┤
//! │ normalize CSS | preclean HTML                             │
//! │ inline -> externalize images -> strip -> math             │
//! ├───────────────────────────────────────────────────────────┤
//! │ write <output_dir>/<stem>.html                            │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Stages are plain `&str -> String` functions and run strictly in this
//! order. The math rewrite comes last: it injects a literal `&` that no
//! later stage may escape.

mod scan;
pub mod transform;
mod write;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{Options, Settings};
use crate::error::{ConvertError, Result};
use crate::log;
use crate::logger::Logger;
use crate::notebook::NotebookReader;
use crate::render::Renderer;

pub use transform::{
    externalize_images, inline_css, normalize_css, preclean_html, remove_style_blocks,
    rewrite_math, strip_attributes,
};
pub use write::{CSS_DUMP, HTML_DUMP, write_debug, write_output};

// =============================================================================
// Types
// =============================================================================

/// Report of a finished conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Written HTML file.
    pub output: PathBuf,
    /// Size of the written HTML in bytes.
    pub bytes: usize,
    /// Image files written to the asset directory, in document order.
    pub images: Vec<PathBuf>,
    pub elapsed: Duration,
}

// =============================================================================
// Entry
// =============================================================================

/// Convert `notebook` into a blog-ready HTML file.
///
/// Options are validated first, so a bad `math_mode` fails without touching
/// the filesystem. Any later failure aborts the run before the HTML file is
/// written; images already externalized are left in place.
pub fn convert(
    notebook: &Path,
    options: &Options,
    reader: &dyn NotebookReader,
    renderer: &dyn Renderer,
) -> Result<Conversion> {
    let settings = options.resolve(notebook)?;
    let logger = Logger::from_quiet(options.quiet);
    run(notebook, &settings, reader, renderer, &logger)
}

/// Run the pipeline with resolved settings and an explicit logger.
pub(crate) fn run(
    notebook: &Path,
    settings: &Settings,
    reader: &dyn NotebookReader,
    renderer: &dyn Renderer,
    logger: &Logger,
) -> Result<Conversion> {
    let started = Instant::now();

    let document = reader.read(notebook).map_err(|source| ConvertError::Notebook {
        path: notebook.to_path_buf(),
        source,
    })?;

    log!(logger, "render"; "using template: {}", settings.template);
    let rendered = renderer
        .render(&document, &settings.template)
        .map_err(ConvertError::Render)?;

    let css = stylesheet(settings, rendered.stylesheet(), logger)?;
    let css = normalize_css(&css);
    if settings.save_css {
        write_debug(&settings.output_dir, CSS_DUMP, &css)?;
    }

    let html = preclean_html(&rendered.html);
    if settings.save_html {
        write_debug(&settings.output_dir, HTML_DUMP, &html)?;
    }

    let html = inline_css(&html, &css, logger)?;

    let (html, images) = match &settings.images {
        Some(image_settings) => externalize_images(&html, image_settings, logger)?,
        None => (html, Vec::new()),
    };

    let html = remove_style_blocks(&html);
    let html = if settings.strip_attributes {
        strip_attributes(&html)?
    } else {
        html
    };
    let html = rewrite_math(&html, &settings.math);

    let output = write_output(&html, &settings.output_dir, &settings.stem)?;
    let elapsed = started.elapsed();
    log!(logger, "write"; "{}: {} bytes written in {:.3}s", output.display(), html.len(), elapsed.as_secs_f64());

    Ok(Conversion {
        output,
        bytes: html.len(),
        images,
        elapsed,
    })
}

/// The CSS to inline: the configured file, else whatever the renderer produced.
fn stylesheet(settings: &Settings, rendered: Option<String>, logger: &Logger) -> Result<String> {
    if let Some(path) = &settings.css_file {
        log!(logger, "css"; "using CSS file {}", path.display());
        return fs::read_to_string(path).map_err(|e| ConvertError::io(path, e));
    }
    Ok(rendered.unwrap_or_else(|| {
        log!(logger, "warning"; "no CSS is generated by the renderer");
        String::new()
    }))
}
