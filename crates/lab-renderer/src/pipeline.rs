//! Full render of a lab document body: tags, then markdown.

use std::time::Instant;

use crate::entities::decode_entities;
use crate::highlight::Highlighter;
use crate::postfix::fix_list_start;
use crate::renderer::MarkdownRenderer;
use crate::tags::{RenderContext, TagEngine, TagError};

/// Error returned when a document cannot be rendered at all.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Tag(#[from] TagError),
}

/// Markdown stage switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// GitHub Flavored Markdown extensions (tables, strikethrough, task lists).
    pub gfm: bool,
    /// Decode HTML entities outside code after markdown conversion.
    pub decode_entities: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            decode_entities: true,
        }
    }
}

/// Result of rendering a lab document body.
#[derive(Clone, Debug)]
pub struct LabRender {
    /// HTML fragment suitable for insertion into `<body>`.
    pub html: String,
    /// Non-fatal problems (unresolvable videos, invalid dates, stray markers).
    pub warnings: Vec<String>,
}

/// One-shot renderer for a lab document body.
///
/// Stages run in a fixed order: tag expansion, markdown conversion (with
/// attribute extension and highlighting), entity decoding, list start fixup.
pub struct Pipeline<'a> {
    ctx: &'a RenderContext,
    options: PipelineOptions,
    highlighter: Option<Box<dyn Highlighter>>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with default options.
    #[must_use]
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self {
            ctx,
            options: PipelineOptions::default(),
            highlighter: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the highlighter for fenced code blocks.
    #[must_use]
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    /// Render a document body (front matter already removed).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Tag`] if a block tag is never closed. No partial
    /// output is produced in that case.
    pub fn render(self, body: &str) -> Result<LabRender, RenderError> {
        let start = Instant::now();

        let mut engine = TagEngine::new(self.ctx);
        let expanded = engine.parse_and_render(body)?;
        let warnings = engine.warnings().to_vec();

        let mut html = MarkdownRenderer::new()
            .with_gfm(self.options.gfm)
            .with_boxed_highlighter(self.highlighter)
            .render_markdown(&expanded);

        if self.options.decode_entities {
            html = decode_entities(&html).into_owned();
        }
        let html = fix_list_start(&html).into_owned();

        tracing::debug!(
            input_bytes = body.len(),
            output_bytes = html.len(),
            warnings = warnings.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rendered lab document"
        );

        Ok(LabRender { html, warnings })
    }
}

/// Render a document body with the given context and options.
///
/// # Errors
///
/// Returns [`RenderError::Tag`] if a block tag is never closed.
pub fn render_lab(
    body: &str,
    ctx: &RenderContext,
    options: &PipelineOptions,
) -> Result<LabRender, RenderError> {
    Pipeline::new(ctx).with_options(*options).render(body)
}
