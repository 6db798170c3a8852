//! Attribute list parsing for the `{: ...}` extension syntax.
//!
//! Parses `#id .class key="value"` lists attached to block elements.

use std::fmt::Write;

use html_escape::encode_double_quoted_attribute;

/// HTML attributes parsed from a `{: ...}` marker.
///
/// Key-value attributes keep their source order so rendered output is
/// deterministic.
///
/// # Example
///
/// ```
/// use lab_renderer::AttrList;
///
/// let attrs = AttrList::parse(r#"#intro .lead start="3""#);
/// assert_eq!(attrs.id.as_deref(), Some("intro"));
/// assert_eq!(attrs.classes, vec!["lead"]);
/// assert_eq!(attrs.get("start"), Some("3"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttrList {
    /// ID from `#id`.
    pub id: Option<String>,
    /// Classes from `.class`.
    pub classes: Vec<String>,
    /// Key-value attributes from `key="value"`, `key='value'` or `key=value`.
    pub attrs: Vec<(String, String)>,
}

impl AttrList {
    /// Parse an attribute list (without the surrounding `{:` and `}`).
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut list = Self::default();
        let mut remaining = input.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = rest.find(is_name_boundary).unwrap_or(rest.len());
                if end > 0 {
                    list.id = Some(rest[..end].to_owned());
                }
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = rest.find(is_name_boundary).unwrap_or(rest.len());
                if end > 0 {
                    list.classes.push(rest[..end].to_owned());
                }
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                list.set(key, value);
                remaining = rest;
            } else {
                // Skip one unrecognized character
                let skip = remaining.chars().next().map_or(0, char::len_utf8);
                remaining = &remaining[skip..];
            }
        }

        list
    }

    /// Get a key-value attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key-value attribute, replacing an earlier value for the same key.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == key) {
            value.clone_into(&mut slot.1);
        } else {
            self.attrs.push((key.to_owned(), value.to_owned()));
        }
    }

    /// Whether no attribute was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    /// Render as HTML attributes with a leading space, e.g. ` id="a" class="b"`.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            write!(out, r#" id="{}""#, encode_double_quoted_attribute(id)).unwrap();
        }
        if !self.classes.is_empty() {
            write!(
                out,
                r#" class="{}""#,
                encode_double_quoted_attribute(&self.classes.join(" "))
            )
            .unwrap();
        }
        for (key, value) in &self.attrs {
            write!(out, r#" {key}="{}""#, encode_double_quoted_attribute(value)).unwrap();
        }
        out
    }
}

fn is_name_boundary(c: char) -> bool {
    c.is_whitespace() || c == '.' || c == '#'
}

/// Parse a key-value pair: `key="value"`, `key='value'` or `key=value`.
///
/// Returns `(key, value, rest)`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = &s[..eq_pos];
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
    {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];
    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

/// Split a trailing `{: ...}` marker off a block's text.
///
/// Returns the text before the marker (trimmed) and the parsed attributes.
/// Returns `None` when the text does not end with a marker or the marker
/// holds no attributes.
pub(crate) fn split_trailing_attrs(text: &str) -> Option<(&str, AttrList)> {
    let trimmed = text.trim_end();
    let without_close = trimmed.strip_suffix('}')?;
    let open = without_close.rfind("{:")?;
    let inner = &without_close[open + 2..];
    if inner.contains(['{', '}']) {
        return None;
    }

    let attrs = AttrList::parse(inner);
    if attrs.is_empty() {
        return None;
    }

    Some((trimmed[..open].trim_end(), attrs))
}
