//! Recursive-descent parser from tokens to a template tree.

use std::vec::IntoIter;

use super::kind::{BlockTag, InlineTag, TagKind};
use super::token::{TagToken, Token};

/// Error raised while parsing tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// A block tag reached the end of the document without its closing marker.
    #[error("tag {tag} not closed (opened on line {line})")]
    Unclosed {
        /// Literal text of the opening tag, e.g. `{% spoiler "Hint" %}`.
        tag: String,
        /// 1-indexed line of the opening tag.
        line: usize,
    },
}

/// One node of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Literal text, including unknown tags kept verbatim.
    Text(String),
    /// An inline tag invocation.
    Inline {
        tag: InlineTag,
        /// Raw argument string (may be empty).
        args: String,
        line: usize,
    },
    /// A block tag invocation with its parsed body.
    Block {
        tag: BlockTag,
        /// Raw argument string (may be empty).
        args: String,
        body: Vec<Node>,
        line: usize,
    },
}

/// A parsed document: a sequence of nodes ready to render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Top-level nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// Parser state: the remaining token stream plus notes about stray markers.
pub(crate) struct Parser<'a> {
    tokens: IntoIter<Token<'a>>,
    warnings: Vec<String>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            warnings: Vec::new(),
        }
    }

    /// Parse all tokens into a template.
    pub(crate) fn parse(mut self) -> Result<(Template, Vec<String>), TagError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.tokens.next() {
            nodes.push(self.parse_token(token)?);
        }
        Ok((Template { nodes }, self.warnings))
    }

    /// Parse one token into a node, consuming further tokens for block tags.
    fn parse_token(&mut self, token: Token<'a>) -> Result<Node, TagError> {
        let tag = match token {
            Token::Text(text) => return Ok(Node::Text(text.to_owned())),
            Token::Tag(tag) => tag,
        };

        match TagKind::from_name(tag.name) {
            Some(TagKind::Inline(inline)) => Ok(Node::Inline {
                tag: inline,
                args: tag.args.to_owned(),
                line: tag.line,
            }),
            Some(TagKind::Block(block)) => {
                let body = self.parse_block_body(block, &tag)?;
                Ok(Node::Block {
                    tag: block,
                    args: tag.args.to_owned(),
                    body,
                    line: tag.line,
                })
            }
            None => {
                if BlockTag::from_closing_name(tag.name).is_some() {
                    tracing::warn!(line = tag.line, tag = tag.raw, "Stray closing tag");
                    self.warnings.push(format!(
                        "line {}: stray {} with no opening tag",
                        tag.line, tag.raw
                    ));
                }
                Ok(Node::Text(tag.raw.to_owned()))
            }
        }
    }

    /// Consume tokens up to the block's closing marker.
    fn parse_block_body(
        &mut self,
        block: BlockTag,
        opener: &TagToken<'a>,
    ) -> Result<Vec<Node>, TagError> {
        let mut body = Vec::new();

        while let Some(token) = self.tokens.next() {
            if let Token::Tag(tag) = &token
                && tag.name == block.closing_name()
            {
                return Ok(body);
            }
            body.push(self.parse_token(token)?);
        }

        Err(TagError::Unclosed {
            tag: opener.raw.to_owned(),
            line: opener.line,
        })
    }
}
