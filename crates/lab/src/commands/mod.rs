//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

use std::path::{Path, PathBuf};

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

use crate::error::CliError;

/// Document read from a lab folder.
const LAB_DOCUMENT: &str = "README.md";

/// Resolve a lab folder or file to the markdown document to render.
fn document_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(LAB_DOCUMENT)
    } else {
        path.to_path_buf()
    }
}

/// Read the lab document at `path`, returning its absolute path and text.
pub(crate) fn read_document(path: &Path) -> Result<(PathBuf, String), CliError> {
    let path = document_path(path);
    let read_error = |source| CliError::Read {
        path: path.display().to_string(),
        source,
    };
    let text = std::fs::read_to_string(&path).map_err(read_error)?;
    let path = std::fs::canonicalize(&path).map_err(read_error)?;
    Ok((path, text))
}
