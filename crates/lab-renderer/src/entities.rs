//! HTML entity decoding for rendered output.

use std::borrow::Cow;
use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

/// Regions copied verbatim: code blocks, inline code and tags themselves.
static VERBATIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b.*?</pre>|<code\b.*?</code>|<[^>]*>").expect("invalid verbatim regex")
});

/// Decode HTML entities in text content.
///
/// Text gets one level of unescaping, so double-escaped output such as
/// `&amp;lt;` reads `&lt;`. Decoded text never becomes markup: `<` and `>`
/// stay escaped. Code (`<pre>`, `<code>`) and attribute values keep their
/// entities so source listings display literally.
pub(crate) fn decode_entities(html: &str) -> Cow<'_, str> {
    if !html.contains('&') {
        return Cow::Borrowed(html);
    }

    let mut output = String::with_capacity(html.len());
    let mut last = 0;

    for region in VERBATIM.find_iter(html) {
        push_decoded(&html[last..region.start()], &mut output);
        output.push_str(region.as_str());
        last = region.end();
    }
    push_decoded(&html[last..], &mut output);

    Cow::Owned(output)
}

fn push_decoded(text: &str, output: &mut String) {
    for ch in decode_html_entities(text).chars() {
        match ch {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_entities_borrowed() {
        assert!(matches!(decode_entities("<p>plain</p>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decodes_text() {
        assert_eq!(
            decode_entities("<p>Tom &amp; Jerry &eacute;&#233; &quot;hi&quot;</p>"),
            "<p>Tom & Jerry éé \"hi\"</p>"
        );
    }

    #[test]
    fn test_double_escaped_text_unescaped_once() {
        assert_eq!(decode_entities("<p>a &amp;lt;b&amp;gt;</p>"), "<p>a &lt;b&gt;</p>");
    }

    #[test]
    fn test_decoded_text_never_becomes_markup() {
        assert_eq!(
            decode_entities("<p>x &lt;3 and &lt;span class=&quot;x&quot;&gt;hi&lt;/span&gt;</p>"),
            "<p>x &lt;3 and &lt;span class=\"x\"&gt;hi&lt;/span&gt;</p>"
        );
    }

    #[test]
    fn test_escaped_link_text_stays_text() {
        let html = r#"<a href="https://example.com/a?b=1&amp;c=&lt;2&gt;">https://example.com/a?b=1&amp;c=&lt;2&gt;</a>"#;
        assert_eq!(
            decode_entities(html),
            r#"<a href="https://example.com/a?b=1&amp;c=&lt;2&gt;">https://example.com/a?b=1&c=&lt;2&gt;</a>"#
        );
    }

    #[test]
    fn test_code_regions_untouched() {
        let html = "<p>a &amp; <code>&lt;b&gt;</code></p>\n<pre><code class=\"language-c\">x &amp;&amp; y\n</code></pre>\n";
        assert_eq!(
            decode_entities(html),
            "<p>a & <code>&lt;b&gt;</code></p>\n<pre><code class=\"language-c\">x &amp;&amp; y\n</code></pre>\n"
        );
    }

    #[test]
    fn test_attribute_values_untouched() {
        let html = r#"<a href="https://www.youtube.com/watch?v=x&amp;list=y">go &amp; see</a>"#;
        assert_eq!(
            decode_entities(html),
            r#"<a href="https://www.youtube.com/watch?v=x&amp;list=y">go & see</a>"#
        );
    }
}
