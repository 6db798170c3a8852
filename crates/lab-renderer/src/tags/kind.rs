//! The closed tag vocabulary.

/// Tags that expand in place and have no body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineTag {
    /// `{% next %}`
    Next,
    /// `{% video "URL" %}`
    Video,
    /// `{% local "DATE" "TIME" ... %}`
    Local,
}

/// Tags that wrap a body up to a closing marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTag {
    /// `{% spoiler "Label" %}` ... `{% endspoiler %}`
    Spoiler,
    /// `{% alert %}` ... `{% endalert %}`
    Alert,
}

/// A recognized tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Inline(InlineTag),
    Block(BlockTag),
}

impl TagKind {
    /// Look up an opening tag by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "next" => Some(Self::Inline(InlineTag::Next)),
            "video" => Some(Self::Inline(InlineTag::Video)),
            "local" => Some(Self::Inline(InlineTag::Local)),
            "spoiler" => Some(Self::Block(BlockTag::Spoiler)),
            "alert" => Some(Self::Block(BlockTag::Alert)),
            _ => None,
        }
    }

    /// Whether `name` is an opening tag or the closing marker of a block tag.
    #[must_use]
    pub fn recognizes(name: &str) -> bool {
        Self::from_name(name).is_some() || BlockTag::from_closing_name(name).is_some()
    }
}

impl InlineTag {
    /// Tag name as written in documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Video => "video",
            Self::Local => "local",
        }
    }
}

impl BlockTag {
    /// Name of the closing marker, e.g. `endspoiler`.
    #[must_use]
    pub fn closing_name(self) -> &'static str {
        match self {
            Self::Spoiler => "endspoiler",
            Self::Alert => "endalert",
        }
    }

    /// Look up a block tag by its closing marker name.
    #[must_use]
    pub fn from_closing_name(name: &str) -> Option<Self> {
        match name {
            "endspoiler" => Some(Self::Spoiler),
            "endalert" => Some(Self::Alert),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(
            TagKind::from_name("next"),
            Some(TagKind::Inline(InlineTag::Next))
        );
        assert_eq!(
            TagKind::from_name("spoiler"),
            Some(TagKind::Block(BlockTag::Spoiler))
        );
        assert_eq!(TagKind::from_name("endspoiler"), None);
        assert_eq!(TagKind::from_name("if"), None);
    }

    #[test]
    fn test_closing_names_round_trip() {
        for tag in [BlockTag::Spoiler, BlockTag::Alert] {
            assert_eq!(BlockTag::from_closing_name(tag.closing_name()), Some(tag));
        }
    }

    #[test]
    fn test_inline_names_round_trip() {
        for tag in [InlineTag::Next, InlineTag::Video, InlineTag::Local] {
            assert_eq!(TagKind::from_name(tag.name()), Some(TagKind::Inline(tag)));
        }
    }

    #[test]
    fn test_recognizes() {
        assert!(TagKind::recognizes("local"));
        assert!(TagKind::recognizes("endalert"));
        assert!(!TagKind::recognizes("include"));
        assert!(!TagKind::recognizes("endnext"));
    }
}
