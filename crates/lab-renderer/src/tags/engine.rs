//! Tag engine: parse a document into a template and render it.

use std::fmt::Write;

use super::kind::{BlockTag, InlineTag};
use super::parser::{Node, Parser, TagError, Template};
use super::token::tokenize;
use super::{RenderContext, args, local, video};

/// Fragment emitted for `{% next %}`.
const NEXT_BUTTON: &str =
    r#"<button class="btn btn-success" data-next type="button">Next</button>"#;

/// Summary used by `{% spoiler %}` when no label is given.
const DEFAULT_SPOILER_SUMMARY: &str = "Spoiler";

/// Template tag engine for one render.
///
/// Create a new engine per document. Warnings about degraded tags (unresolvable
/// video URLs, invalid dates, stray closing markers) accumulate on the engine.
pub struct TagEngine<'a> {
    ctx: &'a RenderContext,
    warnings: Vec<String>,
}

impl<'a> TagEngine<'a> {
    /// Create an engine that renders with the given context.
    #[must_use]
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self {
            ctx,
            warnings: Vec::new(),
        }
    }

    /// Parse document text into a template.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Unclosed`] if a block tag has no closing marker.
    pub fn parse(&mut self, input: &str) -> Result<Template, TagError> {
        let (template, warnings) = Parser::new(tokenize(input)).parse()?;
        self.warnings.extend(warnings);
        Ok(template)
    }

    /// Render a parsed template to text with every tag expanded.
    pub fn render(&mut self, template: &Template) -> String {
        let mut out = String::new();
        self.render_nodes(template.nodes(), &mut out);
        out
    }

    /// Parse and render in one step.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Unclosed`] if a block tag has no closing marker.
    /// Nothing is rendered in that case.
    pub fn parse_and_render(&mut self, input: &str) -> Result<String, TagError> {
        let template = self.parse(input)?;
        Ok(self.render(&template))
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn render_nodes(&mut self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Inline { tag, args, line } => self.render_inline(*tag, args, *line, out),
                Node::Block {
                    tag, args, body, ..
                } => {
                    open_block(*tag, args, out);
                    self.render_nodes(body, out);
                    close_block(*tag, out);
                }
            }
        }
    }

    fn render_inline(&mut self, tag: InlineTag, args: &str, line: usize, out: &mut String) {
        match tag {
            InlineTag::Next => out.push_str(NEXT_BUTTON),
            InlineTag::Video => {
                if !video::render(args, self.ctx, out) {
                    self.degraded(tag, line, args, "URL not recognized, rendered a link");
                }
            }
            InlineTag::Local => {
                if !local::render(args, self.ctx, out) {
                    self.degraded(tag, line, args, "invalid datetime");
                }
            }
        }
    }

    fn degraded(&mut self, tag: InlineTag, line: usize, args: &str, reason: &str) {
        tracing::warn!(line, tag = tag.name(), args, "{reason}");
        self.warnings
            .push(format!("line {line}: {} {reason}: {args}", tag.name()));
    }
}

/// Wrapper markup goes on its own lines with a blank line on each side.
///
/// An HTML block in Markdown runs until the next blank line, so without the
/// separation a body written directly under its opening tag would be passed
/// through as raw text instead of being rendered.
fn open_block(tag: BlockTag, raw_args: &str, out: &mut String) {
    start_html_block(out);
    match tag {
        BlockTag::Spoiler => {
            let summary = args::unquote(raw_args);
            let summary = if summary.is_empty() {
                DEFAULT_SPOILER_SUMMARY
            } else {
                &summary
            };
            write!(
                out,
                "<details class='spoiler'><summary>{summary}</summary>"
            )
            .unwrap();
        }
        BlockTag::Alert => out.push_str(r#"<div class="alert" role="alert">"#),
    }
    out.push_str("\n\n");
}

fn close_block(tag: BlockTag, out: &mut String) {
    start_html_block(out);
    match tag {
        BlockTag::Spoiler => out.push_str("</details>"),
        BlockTag::Alert => out.push_str("</div>"),
    }
    out.push_str("\n\n");
}

/// Make sure `out` ends in a blank line, keeping the indentation of the
/// current line so wrappers inside list items stay in the item.
fn start_html_block(out: &mut String) {
    let content_end = out.trim_end_matches([' ', '\t']).len();
    let mut indent = out.split_off(content_end);
    if !out.is_empty() {
        if !out.ends_with('\n') {
            indent.clear();
        }
        let line_breaks = out[out.trim_end().len()..].matches('\n').count();
        for _ in line_breaks..2 {
            out.push('\n');
        }
    }
    out.push_str(&indent);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn expand(input: &str) -> Result<String, TagError> {
        let ctx = RenderContext::new();
        TagEngine::new(&ctx).parse_and_render(input)
    }

    #[test]
    fn test_text_unchanged() {
        let input = "# Title\n\nSome *markdown* with {{ output }} and {% unknown %}.\n";
        assert_eq!(expand(input).unwrap(), input);
    }

    #[test]
    fn test_next() {
        assert_eq!(
            expand("{% next %}").unwrap(),
            r#"<button class="btn btn-success" data-next type="button">Next</button>"#
        );
    }

    #[test]
    fn test_next_is_deterministic() {
        let input = "a {% next %} b {% next %}";
        assert_eq!(expand(input).unwrap(), expand(input).unwrap());
    }

    #[test]
    fn test_spoiler_with_label() {
        assert_eq!(
            expand("{% spoiler \"Show hint\" %}\n\nUse a loop.\n\n{% endspoiler %}").unwrap(),
            "<details class='spoiler'><summary>Show hint</summary>\n\n\n\nUse a loop.\n\n</details>\n\n"
        );
    }

    #[test]
    fn test_spoiler_default_label() {
        assert_eq!(
            expand("{% spoiler %}x{% endspoiler %}").unwrap(),
            "<details class='spoiler'><summary>Spoiler</summary>\n\nx\n\n</details>\n\n"
        );
        assert_eq!(
            expand("{% spoiler \"\" %}x{% endspoiler %}").unwrap(),
            "<details class='spoiler'><summary>Spoiler</summary>\n\nx\n\n</details>\n\n"
        );
    }

    #[test]
    fn test_alert_ignores_args() {
        assert_eq!(
            expand("{% alert \"warning\" %}Careful{% endalert %}").unwrap(),
            "<div class=\"alert\" role=\"alert\">\n\nCareful\n\n</div>\n\n"
        );
    }

    #[test]
    fn test_nested_blocks_render_depth_first() {
        let output = expand(
            "{% spoiler \"Outer\" %}A{% spoiler \"Inner\" %}B{% next %}{% endspoiler %}C{% endspoiler %}",
        )
        .unwrap();
        assert_eq!(
            output,
            concat!(
                "<details class='spoiler'><summary>Outer</summary>\n\nA\n\n",
                "<details class='spoiler'><summary>Inner</summary>\n\nB",
                r#"<button class="btn btn-success" data-next type="button">Next</button>"#,
                "\n\n</details>\n\nC\n\n</details>\n\n"
            )
        );
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 50;
        let input = format!(
            "{}core{}",
            "{% alert %}".repeat(depth),
            "{% endalert %}".repeat(depth)
        );
        let output = expand(&input).unwrap();
        assert_eq!(output.matches(r#"<div class="alert""#).count(), depth);
        assert_eq!(output.matches("</div>").count(), depth);
    }

    #[test]
    fn test_unclosed_fails_whole_render() {
        let err = expand("{% next %}\n{% alert %}\nnever closed").unwrap_err();
        assert!(matches!(err, TagError::Unclosed { ref tag, line: 2 } if tag == "{% alert %}"));
    }

    #[test]
    fn test_degraded_tags_do_not_abort_siblings() {
        let ctx = RenderContext::new();
        let mut engine = TagEngine::new(&ctx);
        let output = engine
            .parse_and_render("{% local \"bad\" %} {% video \"nope\" %} {% next %}")
            .unwrap();
        assert!(output.starts_with("invalid datetime "));
        assert!(output.contains(r#"<a href="nope""#));
        assert!(output.ends_with(NEXT_BUTTON));
        assert_eq!(
            engine.warnings(),
            [
                r#"line 1: local invalid datetime: "bad""#,
                r#"line 1: video URL not recognized, rendered a link: "nope""#,
            ]
        );
    }

    #[test]
    fn test_whitespace_control() {
        assert_eq!(
            expand("{% alert -%}\n  body\n{%- endalert %}").unwrap(),
            "<div class=\"alert\" role=\"alert\">\n\nbody\n\n</div>\n\n"
        );
    }

    #[test]
    fn test_wrappers_on_own_lines() {
        assert_eq!(
            expand("Intro {% alert %}\nRun `make`.\n{% endalert %} after").unwrap(),
            "Intro\n\n<div class=\"alert\" role=\"alert\">\n\n\nRun `make`.\n\n</div>\n\n after"
        );
    }

    #[test]
    fn test_wrappers_keep_list_indentation() {
        assert_eq!(
            expand("1. Step\n   {% spoiler %}\n   hint\n   {% endspoiler %}\n").unwrap(),
            concat!(
                "1. Step\n\n   <details class='spoiler'><summary>Spoiler</summary>\n\n\n   hint\n\n",
                "   </details>\n\n\n"
            )
        );
    }

    #[test]
    fn test_parse_then_render_separately() {
        let ctx = RenderContext::new();
        let mut engine = TagEngine::new(&ctx);
        let template = engine.parse("{% next %}").unwrap();
        assert_eq!(engine.render(&template), engine.render(&template));
    }
}
