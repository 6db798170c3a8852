//! Markdown to HTML with attribute extension and code highlighting.

use pulldown_cmark::{
    BlockQuoteKind, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream,
    html,
};

use crate::attrs::{AttrList, split_trailing_attrs};
use crate::highlight::Highlighter;

/// Markdown renderer for tag-expanded lab text.
///
/// Raw HTML is passed through untouched, so fragments produced by the tag
/// engine survive conversion. On top of `pulldown-cmark` the renderer:
///
/// - attaches a trailing `{: #id .class key="value"}` to its paragraph,
///   heading, list item, list or block quote
/// - hands fenced code blocks to an optional [`Highlighter`]
pub struct MarkdownRenderer {
    gfm: bool,
    highlighter: Option<Box<dyn Highlighter>>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            highlighter: None,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Set the highlighter used for fenced code blocks with a language.
    #[must_use]
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    /// Set a boxed highlighter, or remove it with `None`.
    #[must_use]
    pub fn with_boxed_highlighter(mut self, highlighter: Option<Box<dyn Highlighter>>) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text to an HTML fragment.
    pub fn render_markdown(&mut self, markdown: &str) -> String {
        let events = TextMergeStream::new(self.create_parser(markdown));
        let events = attach_attributes(events);
        let events = self.highlight_code_blocks(events);

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    /// Replace fenced code blocks with highlighter output where available.
    fn highlight_code_blocks<'a>(&mut self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let Some(highlighter) = self.highlighter.as_mut() else {
            return events;
        };

        let mut output = Vec::with_capacity(events.len());
        let mut events = events.into_iter();

        while let Some(event) = events.next() {
            let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = &event else {
                output.push(event);
                continue;
            };
            let Some(language) = info.split_whitespace().next().map(str::to_owned) else {
                output.push(event);
                continue;
            };

            let mut source = String::new();
            let mut block = vec![event];
            for inner in events.by_ref() {
                if let Event::Text(text) = &inner {
                    source.push_str(text);
                }
                let done = matches!(inner, Event::End(TagEnd::CodeBlock));
                block.push(inner);
                if done {
                    break;
                }
            }

            match highlighter.highlight(&language, &source) {
                Some(highlighted) => output.push(Event::Html(highlighted.into())),
                None => output.extend(block),
            }
        }

        output
    }
}

/// Move trailing `{: ...}` attribute lists onto the block they close.
///
/// The attributes end up on:
/// - the paragraph or heading whose text it ends
/// - the tight list item whose text it ends, on the same line
/// - the list, when on its own line after the last tight item
/// - the list or block quote right before a paragraph holding nothing else
///
/// Headings keep their own start event with the attributes filled in. Other
/// elements become raw HTML opening tags since `pulldown-cmark` has no
/// attribute slot for them. An attribute-only paragraph directly before a
/// list stays a paragraph so its attributes can carry over to that list.
fn attach_attributes<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut events = events.peekable();
    let mut output: Vec<Event<'a>> = Vec::new();
    let mut open_blocks: Vec<usize> = Vec::new();
    let mut open_containers: Vec<usize> = Vec::new();
    // (end, start) of the most recently closed list or block quote
    let mut last_closed: Option<(usize, usize)> = None;

    while let Some(event) = events.next() {
        match &event {
            Event::Start(Tag::Paragraph | Tag::Heading { .. }) => {
                open_blocks.push(output.len());
                output.push(event);
            }
            Event::Start(Tag::List(_) | Tag::Item | Tag::BlockQuote(_)) => {
                open_containers.push(output.len());
                output.push(event);
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_)) => {
                let Some(start) = open_blocks.pop() else {
                    output.push(event);
                    continue;
                };
                let Some(trailing) = take_trailing_attrs(&mut output, start) else {
                    output.push(event);
                    continue;
                };
                let attrs_only = output.len() == start + 1;
                let before_list = matches!(events.peek(), Some(Event::Start(Tag::List(_))));
                let container = last_closed
                    .filter(|&(end, _)| end + 1 == start)
                    .map(|(_, container)| container);
                match container {
                    Some(container)
                        if attrs_only
                            && !before_list
                            && matches!(event, Event::End(TagEnd::Paragraph)) =>
                    {
                        output.truncate(start);
                        set_container_attrs(&mut output, container, trailing.attrs);
                    }
                    _ => apply_attrs(&mut output, start, trailing.attrs, event),
                }
            }
            Event::End(TagEnd::Item) => {
                let Some(start) = open_containers.pop() else {
                    output.push(event);
                    continue;
                };
                if let Some(trailing) = take_trailing_attrs(&mut output, start) {
                    let last_item = matches!(events.peek(), Some(Event::End(TagEnd::List(_))));
                    match open_containers.last() {
                        Some(&list) if trailing.own_line && last_item => {
                            set_container_attrs(&mut output, list, trailing.attrs);
                        }
                        _ => set_container_attrs(&mut output, start, trailing.attrs),
                    }
                }
                output.push(event);
            }
            Event::End(TagEnd::List(_) | TagEnd::BlockQuote(_)) => {
                if let Some(start) = open_containers.pop() {
                    last_closed = Some((output.len(), start));
                }
                output.push(event);
            }
            _ => output.push(event),
        }
    }

    output
}

struct TrailingAttrs {
    attrs: AttrList,
    /// The attributes sat on a line of their own after the block's text.
    own_line: bool,
}

/// Strip an attribute list from the last text event of the block opened at `start`.
fn take_trailing_attrs(output: &mut Vec<Event<'_>>, start: usize) -> Option<TrailingAttrs> {
    if output.len() <= start + 1 {
        return None;
    }
    let Some(Event::Text(text)) = output.last() else {
        return None;
    };
    let (rest, attrs) = split_trailing_attrs(text)?;
    let rest = rest.to_owned();

    output.pop();
    let mut own_line = false;
    if rest.is_empty() {
        // `text\n{: .x}` leaves a dangling line break
        if output.len() > start + 1
            && matches!(output.last(), Some(Event::SoftBreak | Event::HardBreak))
        {
            output.pop();
            own_line = true;
        }
    } else {
        output.push(Event::Text(rest.into()));
    }
    Some(TrailingAttrs { attrs, own_line })
}

fn apply_attrs<'a>(output: &mut Vec<Event<'a>>, start: usize, attrs: AttrList, end: Event<'a>) {
    if let Event::Start(Tag::Heading {
        id,
        classes,
        attrs: heading_attrs,
        ..
    }) = &mut output[start]
    {
        if let Some(new_id) = attrs.id {
            *id = Some(CowStr::from(new_id));
        }
        classes.extend(attrs.classes.into_iter().map(CowStr::from));
        heading_attrs.extend(
            attrs
                .attrs
                .into_iter()
                .map(|(key, value)| (CowStr::from(key), Some(CowStr::from(value)))),
        );
        output.push(end);
        return;
    }

    let open = format!("{}<p{}>", line_break(output, start), attrs.to_html());
    output[start] = Event::Html(open.into());
    output.push(Event::Html("</p>\n".into()));
}

/// Replace the start event of a list, item or block quote with a raw opening
/// tag carrying `attrs`. Matching end events still render the closing tag.
fn set_container_attrs(output: &mut [Event<'_>], start: usize, mut attrs: AttrList) {
    let open = match &output[start] {
        Event::Start(Tag::List(None)) => format!("<ul{}>\n", attrs.to_html()),
        Event::Start(Tag::List(Some(first))) => {
            if *first != 1 && attrs.get("start").is_none() {
                attrs.set("start", &first.to_string());
            }
            format!("<ol{}>\n", attrs.to_html())
        }
        Event::Start(Tag::Item) => format!("<li{}>", attrs.to_html()),
        Event::Start(Tag::BlockQuote(kind)) => {
            if let Some(kind) = kind {
                attrs.classes.insert(0, alert_class(kind).to_owned());
            }
            format!("<blockquote{}>\n", attrs.to_html())
        }
        _ => return,
    };
    let open = format!("{}{open}", line_break(output, start));
    output[start] = Event::Html(open.into());
}

/// `"\n"` when the HTML written before `index` ends mid-line.
///
/// `pulldown-cmark` starts block tags on a fresh line but writes raw HTML
/// events as given, so replaced start events have to add the break.
fn line_break(output: &[Event<'_>], index: usize) -> &'static str {
    let Some(previous) = index.checked_sub(1).map(|i| &output[i]) else {
        return "";
    };
    let mid_line = match previous {
        Event::Html(html) => !html.ends_with('\n'),
        Event::Start(Tag::Item)
        | Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_) => true,
        Event::End(
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image,
        ) => true,
        _ => false,
    };
    if mid_line { "\n" } else { "" }
}

/// Class `pulldown-cmark` gives GFM alert block quotes.
fn alert_class(kind: &BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "markdown-alert-note",
        BlockQuoteKind::Tip => "markdown-alert-tip",
        BlockQuoteKind::Important => "markdown-alert-important",
        BlockQuoteKind::Warning => "markdown-alert-warning",
        BlockQuoteKind::Caution => "markdown-alert-caution",
    }
}
