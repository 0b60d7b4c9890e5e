//! Output and debug file writing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// File name of the stylesheet dump.
pub const CSS_DUMP: &str = "style.css";
/// File name of the raw renderer HTML dump.
pub const HTML_DUMP: &str = "input.html";

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))
}

/// Write the final HTML to `<output_dir>/<stem>.html`, creating the
/// directory if needed. Returns the written path.
pub fn write_output(html: &str, output_dir: &Path, stem: &str) -> Result<PathBuf> {
    ensure_dir(output_dir)?;
    let path = output_dir.join(format!("{stem}.html"));
    fs::write(&path, html).map_err(|e| ConvertError::io(&path, e))?;
    Ok(path)
}

/// Write an intermediate artifact (`style.css`, `input.html`) for debugging.
pub fn write_debug(output_dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    ensure_dir(output_dir)?;
    let path = output_dir.join(name);
    fs::write(&path, contents).map_err(|e| ConvertError::io(&path, e))?;
    Ok(path)
}
