//! Tokenizer for `{% ... %}` tag syntax.

use super::TagKind;

/// A piece of document text: either literal text or a tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Tag(TagToken<'a>),
}

/// A `{% name args %}` occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TagToken<'a> {
    /// Literal source text, delimiters included.
    pub raw: &'a str,
    /// Tag name (first word inside the delimiters).
    pub name: &'a str,
    /// Everything after the name, trimmed.
    pub args: &'a str,
    /// 1-indexed line of the opening delimiter.
    pub line: usize,
}

const OPEN: &str = "{%";
const CLOSE: &str = "%}";

/// Split text into tokens.
///
/// Whitespace control markers (`{%-` and `-%}`) on recognized tags trim
/// whitespace from the neighbouring text tokens. Unterminated `{%` and empty
/// tags are kept as text.
pub(crate) fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;
    let mut trim_next = false;

    while let Some(offset) = input[pos..].find(OPEN) {
        let start = pos + offset;
        let Some(close_offset) = input[start + OPEN.len()..].find(CLOSE) else {
            break;
        };
        let end = start + OPEN.len() + close_offset + CLOSE.len();
        let raw = &input[start..end];
        let inner = &raw[OPEN.len()..raw.len() - CLOSE.len()];

        let trim_before = inner.starts_with('-');
        let trim_after = inner.ends_with('-') && inner.len() > 1;
        let inner = inner.strip_prefix('-').unwrap_or(inner);
        let inner = inner.strip_suffix('-').unwrap_or(inner).trim();

        let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
        let name = &inner[..name_end];

        if name.is_empty() {
            // Keep `{% %}` as text and continue after its opening delimiter
            push_text(&mut tokens, &input[pos..start + OPEN.len()], &mut trim_next, false);
            line += count_lines(&input[pos..start + OPEN.len()]);
            pos = start + OPEN.len();
            continue;
        }

        let controls = TagKind::recognizes(name);
        push_text(
            &mut tokens,
            &input[pos..start],
            &mut trim_next,
            controls && trim_before,
        );
        line += count_lines(&input[pos..start]);

        tokens.push(Token::Tag(TagToken {
            raw,
            name,
            args: inner[name_end..].trim(),
            line,
        }));
        line += count_lines(raw);

        trim_next = controls && trim_after;
        pos = end;
    }

    push_text(&mut tokens, &input[pos..], &mut trim_next, false);
    tokens
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str, trim_start: &mut bool, trim_end: bool) {
    let mut text = text;
    if std::mem::take(trim_start) {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tag<'a>(raw: &'a str, name: &'a str, args: &'a str, line: usize) -> Token<'a> {
        Token::Tag(TagToken {
            raw,
            name,
            args,
            line,
        })
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("just text"), vec![Token::Text("just text")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_single_tag() {
        assert_eq!(
            tokenize("before {% next %} after"),
            vec![
                Token::Text("before "),
                tag("{% next %}", "next", "", 1),
                Token::Text(" after"),
            ]
        );
    }

    #[test]
    fn test_tag_args() {
        assert_eq!(
            tokenize(r#"{%   spoiler   "A hint"  %}"#),
            vec![tag(r#"{%   spoiler   "A hint"  %}"#, "spoiler", r#""A hint""#, 1)]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("line one\n\n{% alert %}\nbody\n{% endalert %}");
        let lines: Vec<usize> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Tag(tag) => Some(tag.line),
                Token::Text(_) => None,
            })
            .collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn test_whitespace_control() {
        assert_eq!(
            tokenize("a \n {%- next -%} \n b"),
            vec![
                Token::Text("a"),
                tag("{%- next -%}", "next", "", 2),
                Token::Text("b"),
            ]
        );
    }

    #[test]
    fn test_whitespace_control_ignored_for_unknown_tags() {
        assert_eq!(
            tokenize("a {%- if x -%} b"),
            vec![
                Token::Text("a "),
                tag("{%- if x -%}", "if", "x", 1),
                Token::Text(" b"),
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        assert_eq!(
            tokenize("{% next %} then {% broken"),
            vec![
                tag("{% next %}", "next", "", 1),
                Token::Text(" then {% broken"),
            ]
        );
    }

    #[test]
    fn test_empty_tag_is_text() {
        assert_eq!(
            tokenize("{% %}{% next %}"),
            vec![
                Token::Text("{%"),
                Token::Text(" %}"),
                tag("{% next %}", "next", "", 1),
            ]
        );
    }

    #[test]
    fn test_output_markup_is_text() {
        assert_eq!(tokenize("{{ page.title }}"), vec![Token::Text("{{ page.title }}")]);
    }
}
