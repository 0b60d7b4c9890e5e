//! Conversion error types.
//!
//! Every failure is fatal to the run: there are no retries and no partial
//! success. Warnings (e.g. a renderer that produced no CSS) go through the
//! [`Logger`](crate::Logger) instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used across the pipeline.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Errors produced by a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// `math_mode` is neither the directive target nor empty.
    #[error("invalid math mode `{0}` (expected \"wp\" or an empty string)")]
    InvalidMathMode(String),

    #[error("config parsing error")]
    Config(#[from] toml::de::Error),

    /// A `data:` image whose transfer encoding is not base64.
    #[error("unsupported image encoding `{encoding}`")]
    UnsupportedEncoding { encoding: String },

    #[error("malformed data URI `{0}`")]
    MalformedDataUri(String),

    #[error("invalid base64 image payload")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error on `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read notebook `{path}`")]
    Notebook {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("renderer failed")]
    Render(#[source] anyhow::Error),

    #[error("stylesheet error: {0}")]
    Stylesheet(String),

    #[error("HTML rewriting failed: {0}")]
    Rewrite(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this is an IO error for a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
