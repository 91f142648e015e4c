//! Fenced and inline code detection

use super::{Segment, DEFAULT_CODE_LANGUAGE};
use once_cell::sync::Lazy;
use regex::Regex;

/// Parse `text` into a lazy sequence of segments.
///
/// Fenced blocks are found first. Inline spans are only looked for in the
/// text after the last fenced block (the whole text when there is none).
pub fn parse(text: &str) -> Segments<'_> {
    Segments {
        text,
        pos: 0,
        phase: Phase::Fenced,
        pending: None,
        emitted: false,
    }
}

/// Parse `text` and collect every segment
pub fn parse_segments(text: &str) -> Vec<Segment<'_>> {
    parse(text).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fenced,
    Inline,
    Done,
}

/// Iterator over the segments of a message.
///
/// Cloning the iterator restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
    phase: Phase,
    pending: Option<Segment<'a>>,
    emitted: bool,
}

impl<'a> Segments<'a> {
    fn emit(&mut self, segment: Segment<'a>) -> Option<Segment<'a>> {
        self.emitted = true;
        Some(segment)
    }

    /// Emit the text between the cursor and `start`, queueing `segment`
    /// right behind it.
    fn emit_with_prefix(
        &mut self,
        start: usize,
        end: usize,
        segment: Segment<'a>,
    ) -> Option<Segment<'a>> {
        let prefix = &self.text[self.pos..start];
        self.pos = end;
        if prefix.is_empty() {
            return self.emit(segment);
        }
        self.pending = Some(segment);
        self.emit(Segment::Text(prefix))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return self.emit(segment);
        }

        loop {
            match self.phase {
                Phase::Fenced => match find_fence(self.text, self.pos) {
                    Some(fence) => {
                        let language = if fence.language.is_empty() {
                            DEFAULT_CODE_LANGUAGE
                        } else {
                            fence.language
                        };
                        let block = Segment::CodeBlock {
                            language,
                            content: fence.body.trim(),
                        };
                        return self.emit_with_prefix(fence.start, fence.end, block);
                    }
                    None => self.phase = Phase::Inline,
                },
                Phase::Inline => match find_inline(self.text, self.pos) {
                    Some(span) => {
                        return self.emit_with_prefix(
                            span.start,
                            span.end,
                            Segment::InlineCode(span.inner),
                        );
                    }
                    None => {
                        self.phase = Phase::Done;
                        let rest = &self.text[self.pos..];
                        self.pos = self.text.len();
                        // An empty message still renders as one empty text segment.
                        if !rest.is_empty() || !self.emitted {
                            return self.emit(Segment::Text(rest));
                        }
                    }
                },
                Phase::Done => return None,
            }
        }
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

struct FenceMatch<'a> {
    start: usize,
    end: usize,
    language: &'a str,
    body: &'a str,
}

struct InlineMatch<'a> {
    start: usize,
    end: usize,
    inner: &'a str,
}

// Tag is ASCII word characters only; the body is matched lazily up to the
// next fence.
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```((?-u:\w)*)\n(.*?)```").expect("valid fence pattern"));

static INLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code pattern"));

/// Leftmost fenced block at or after `from`.
fn find_fence(text: &str, from: usize) -> Option<FenceMatch<'_>> {
    let caps = FENCE_RE.captures_at(text, from)?;
    let whole = caps.get(0)?;
    Some(FenceMatch {
        start: whole.start(),
        end: whole.end(),
        language: caps.get(1).map_or("", |m| m.as_str()),
        body: caps.get(2).map_or("", |m| m.as_str()),
    })
}

/// Leftmost inline span with a non-empty, backtick-free interior.
fn find_inline(text: &str, from: usize) -> Option<InlineMatch<'_>> {
    let caps = INLINE_RE.captures_at(text, from)?;
    let whole = caps.get(0)?;
    Some(InlineMatch {
        start: whole.start(),
        end: whole.end(),
        inner: caps.get(1).map_or("", |m| m.as_str()),
    })
}
