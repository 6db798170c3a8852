//! CLI error types.

use lab_config::{ConfigError, FrontMatterError};
use lab_renderer::{RenderError, TagError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    FrontMatter(#[from] FrontMatterError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Tag(#[from] TagError),

    #[error("{path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
