//! Structural fixups applied to the final HTML.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// An attribute-only paragraph directly followed by an ordered list.
static PARAGRAPH_BEFORE_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<p((?:\s+[A-Za-z_:][-\w:.]*="[^"]*")+)\s*>\s*</p>\s*<ol(?:\s+start="\d+")?>"#)
        .expect("invalid list start regex")
});

/// Move the attributes of an empty `<p start="N"></p>` onto the following `<ol>`.
///
/// Markdown has no way to attach attributes to a list, so authors write
/// `{: start="3"}` on the line before it. That produces an empty paragraph
/// which is dropped here. Paragraphs without a `start` attribute are left alone.
pub(crate) fn fix_list_start(html: &str) -> Cow<'_, str> {
    PARAGRAPH_BEFORE_LIST.replace_all(html, |caps: &Captures<'_>| {
        let attrs = &caps[1];
        if attrs.split_whitespace().any(|attr| attr.starts_with("start=")) {
            format!("<ol{attrs}>")
        } else {
            caps[0].to_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_moves_start() {
        assert_eq!(
            fix_list_start("<p start=\"3\"></p>\n<ol>\n<li>a</li>\n</ol>\n"),
            "<ol start=\"3\">\n<li>a</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_moves_all_attributes() {
        assert_eq!(
            fix_list_start("<p class=\"steps\" start=\"5\"></p>\n<ol>"),
            "<ol class=\"steps\" start=\"5\">"
        );
    }

    #[test]
    fn test_replaces_existing_start() {
        assert_eq!(
            fix_list_start("<p start=\"7\"></p>\n<ol start=\"2\">"),
            "<ol start=\"7\">"
        );
    }

    #[test]
    fn test_without_start_unchanged() {
        let html = "<p class=\"note\"></p>\n<ol>\n<li>a</li>\n</ol>\n";
        assert_eq!(fix_list_start(html), html);
    }

    #[test]
    fn test_non_empty_paragraph_unchanged() {
        let html = "<p start=\"3\">text</p>\n<ol>\n";
        assert_eq!(fix_list_start(html), html);
    }

    #[test]
    fn test_unordered_list_unchanged() {
        let html = "<p start=\"3\"></p>\n<ul>\n";
        assert_eq!(fix_list_start(html), html);
    }

    #[test]
    fn test_no_match_borrowed() {
        assert!(matches!(fix_list_start("<p>a</p>"), Cow::Borrowed(_)));
    }
}
