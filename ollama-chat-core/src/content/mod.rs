//! Message content segmentation
//!
//! Splits chat message text into plain text, fenced code blocks and inline
//! code spans so a renderer can style each piece. Parsing never fails:
//! anything that does not form a complete code construct stays plain text.

pub mod parser;

pub use parser::{parse, parse_segments, Segments};

/// Language reported for fenced blocks that carry no tag
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

/// One classified chunk of message content, borrowed from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text, verbatim
    Text(&'a str),
    /// Fenced code block with its language tag and trimmed body
    CodeBlock {
        language: &'a str,
        content: &'a str,
    },
    /// Single-backtick code span
    InlineCode(&'a str),
}

impl<'a> Segment<'a> {
    /// The textual payload of the segment
    pub fn content(&self) -> &'a str {
        match *self {
            Segment::Text(content) | Segment::InlineCode(content) => content,
            Segment::CodeBlock { content, .. } => content,
        }
    }

    /// Language tag for code blocks
    pub fn language(&self) -> Option<&'a str> {
        match *self {
            Segment::CodeBlock { language, .. } => Some(language),
            _ => None,
        }
    }

    /// Whether this segment should be rendered as code
    pub fn is_code(&self) -> bool {
        !matches!(self, Segment::Text(_))
    }
}
