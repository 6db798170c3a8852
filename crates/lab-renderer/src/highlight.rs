//! Pluggable syntax highlighting for fenced code blocks.

/// Syntax highlighter for fenced code blocks.
///
/// Called once per fenced block that declares a language. Returning `None`
/// keeps the default `<pre><code class="language-X">` output.
///
/// # Example
///
/// ```
/// use lab_renderer::{Highlighter, MarkdownRenderer};
///
/// struct Shouting;
///
/// impl Highlighter for Shouting {
///     fn highlight(&mut self, language: &str, source: &str) -> Option<String> {
///         (language == "shout").then(|| format!("<pre>{}</pre>", source.to_uppercase()))
///     }
/// }
///
/// let html = MarkdownRenderer::new()
///     .with_highlighter(Shouting)
///     .render_markdown("```shout\nhello\n```\n");
/// assert_eq!(html, "<pre>HELLO\n</pre>");
/// ```
pub trait Highlighter: Send {
    /// Highlight `source` written in `language`.
    ///
    /// The returned string is inserted verbatim and must be complete HTML for
    /// the whole block, including the `<pre>` wrapper.
    fn highlight(&mut self, language: &str, source: &str) -> Option<String>;
}
