//! Notebook documents and the reader collaborator.
//!
//! The pipeline only needs a versioned document to hand to the
//! [`Renderer`](crate::Renderer); [`IpynbReader`] reads nbformat v4 JSON.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Supported nbformat major version.
pub const NBFORMAT_MAJOR: u32 = 4;

/// Reads a notebook file into a [`Notebook`].
pub trait NotebookReader {
    fn read(&self, path: &Path) -> Result<Notebook>;
}

/// Versioned notebook document.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    pub nbformat: u32,
    pub nbformat_minor: u32,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: CellKind,
    /// Source text, joined when stored as a list of lines.
    #[serde(deserialize_with = "multiline")]
    pub source: String,
    #[serde(default)]
    pub metadata: Value,
    /// Raw output objects (code cells only).
    #[serde(default)]
    pub outputs: Vec<Value>,
    #[serde(default)]
    pub execution_count: Option<u64>,
}

/// nbformat stores text either as one string or as a list of lines.
fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MultiLine {
        One(String),
        Lines(Vec<String>),
    }

    Ok(match MultiLine::deserialize(deserializer)? {
        MultiLine::One(text) => text,
        MultiLine::Lines(lines) => lines.concat(),
    })
}

impl Notebook {
    /// Parse notebook JSON, rejecting unsupported major versions.
    pub fn from_json(json: &str) -> Result<Self> {
        let notebook: Self = serde_json::from_str(json).context("invalid notebook JSON")?;
        if notebook.nbformat != NBFORMAT_MAJOR {
            bail!(
                "unsupported nbformat {}.{} (expected {}.x)",
                notebook.nbformat,
                notebook.nbformat_minor,
                NBFORMAT_MAJOR
            );
        }
        Ok(notebook)
    }

    /// Cells of the given kind.
    pub fn cells_of(&self, kind: CellKind) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(move |cell| cell.cell_type == kind)
    }
}

/// Reads `.ipynb` (nbformat v4) files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpynbReader;

impl NotebookReader for IpynbReader {
    fn read(&self, path: &Path) -> Result<Notebook> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read `{}`", path.display()))?;
        Notebook::from_json(&json)
    }
}
