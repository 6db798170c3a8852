//! Template tag engine for lab documents.
//!
//! Expands `{% name args %}` tags into HTML fragments before markdown rendering.
//!
//! # Vocabulary
//!
//! - `{% next %}`: a "Next" button that reveals the following section
//! - `{% video "URL" %}`: a YouTube embed, or a thumbnail outside hosted environments
//! - `{% spoiler "Label" %}` ... `{% endspoiler %}`: a collapsible disclosure
//! - `{% alert %}` ... `{% endalert %}`: an alert box
//! - `{% local "DATE" "TIME" ... %}`: a date/time (range) in a fixed time zone
//!
//! # Processing Model
//!
//! The engine works in two phases over a fresh instance per document:
//!
//! 1. **Parse**: the text is split into [`Token`](token::Token)s and parsed into
//!    a [`Template`] tree. Block tags consume tokens up to their closing marker;
//!    a missing closing marker is a [`TagError::Unclosed`] and nothing is rendered.
//! 2. **Render**: the tree is walked depth-first into one output string.
//!
//! Unknown tags, stray closing markers and `{{ ... }}` output markup are kept
//! verbatim.
//!
//! # Example
//!
//! ```
//! use lab_renderer::tags::{RenderContext, TagEngine};
//!
//! let ctx = RenderContext::new();
//! let mut engine = TagEngine::new(&ctx);
//! let output = engine
//!     .parse_and_render("{% spoiler \"Hint\" %}Try again{% endspoiler %}")
//!     .unwrap();
//! assert_eq!(
//!     output,
//!     "<details class='spoiler'><summary>Hint</summary>Try again</details>"
//! );
//! ```

mod args;
mod context;
mod engine;
mod kind;
mod local;
mod parser;
mod token;
mod video;

pub use context::{DEFAULT_TIME_CONVERTER_URL, DEFAULT_TIMEZONE, RenderContext};
pub use engine::TagEngine;
pub use kind::{BlockTag, InlineTag, TagKind};
pub use parser::{Node, TagError, Template};
