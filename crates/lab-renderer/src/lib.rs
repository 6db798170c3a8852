//! Rendering core for interactive lab documents.
//!
//! A lab document is markdown with a small vocabulary of template tags
//! (`{% next %}`, `{% video %}`, `{% spoiler %}`, `{% alert %}`, `{% local %}`).
//! Rendering happens in two stages:
//!
//! 1. The [`tags`] engine expands every recognized tag into an HTML fragment.
//! 2. The [`MarkdownRenderer`] converts the expanded text to HTML, attaching
//!    `{: key="value"}` attributes, highlighting fenced code, decoding entities
//!    and fixing up ordered list numbering.
//!
//! [`Pipeline`] runs both stages for one document.
//!
//! # Example
//!
//! ```
//! use lab_renderer::{Pipeline, RenderContext};
//!
//! let ctx = RenderContext::new();
//! let result = Pipeline::new(&ctx).render("# Lab\n\n{% next %}").unwrap();
//! assert!(result.html.contains("data-next"));
//! ```

mod attrs;
mod entities;
mod highlight;
mod pipeline;
mod postfix;
mod renderer;
pub mod tags;

pub use attrs::AttrList;
pub use highlight::Highlighter;
pub use pipeline::{LabRender, Pipeline, PipelineOptions, RenderError, render_lab};
pub use renderer::MarkdownRenderer;
pub use tags::{RenderContext, TagEngine, TagError};
