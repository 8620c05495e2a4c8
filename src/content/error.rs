//! Content load error taxonomy
//!
//! Absence is not an error: an unknown slug or a body file that has gone
//! missing resolves to `None` and callers render a not-found response.
//! `LoadError` covers content that exists but cannot be loaded.

use std::path::PathBuf;
use thiserror::Error;

/// A content file that exists but could not be turned into a renderable body
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-matter in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}
