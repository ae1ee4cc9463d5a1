//! Ordered chain of input segments backing the tokenizer.
//!
//! Each segment is either borrowed from the caller (zero-copy, valid for
//! `'buf`) or copied into the chain. The cursor walks the chain one byte at a
//! time and never goes backwards; segments are therefore append-only and the
//! refill callback may add more while a token is in flight.

use alloc::{borrow::Cow, boxed::Box, vec::Vec};

/// One input segment.
enum Segment<'buf> {
    Borrowed(&'buf [u8]),
    Copied(Box<[u8]>),
}

impl Segment<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Segment::Borrowed(s) => s,
            Segment::Copied(b) => b,
        }
    }
}

/// Result of inspecting the byte under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Peeked {
    /// A byte is available.
    Byte(u8),
    /// The cursor sits at the end of the current segment; the caller decides
    /// what to flush before advancing to the next one.
    EndOfSegment,
    /// No buffered segments remain.
    Exhausted,
}

/// The segment chain plus cursor and position bookkeeping.
///
/// Handed to the refill callback so it can append data while the tokenizer is
/// suspended mid-token.
pub struct InputChain<'buf> {
    segments: Vec<Segment<'buf>>,
    seg: usize,
    off: usize,
    total_bytes: usize,
    line: usize,
    column: usize,
}

impl<'buf> InputChain<'buf> {
    pub(crate) fn new() -> Self {
        Self {
            segments: Vec::new(),
            seg: 0,
            off: 0,
            total_bytes: 0,
            line: 1,
            column: 1,
        }
    }

    /// Appends a borrowed segment. The backing memory must stay alive for
    /// `'buf`, including for any borrowed token text produced from it.
    pub fn add_data(&mut self, data: &'buf [u8]) {
        self.total_bytes += data.len();
        self.segments.push(Segment::Borrowed(data));
    }

    /// Appends a copy of `data`; the chain owns the bytes from then on.
    pub fn add_data_copy(&mut self, data: &[u8]) {
        self.total_bytes += data.len();
        self.segments.push(Segment::Copied(data.into()));
    }

    /// Total bytes ever appended. Used to detect whether a refill callback
    /// actually supplied anything.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// 1-based line and column of the cursor.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub(crate) fn peek_raw(&self) -> Peeked {
        let Some(segment) = self.segments.get(self.seg) else {
            return Peeked::Exhausted;
        };
        match segment.bytes().get(self.off) {
            Some(&b) => Peeked::Byte(b),
            None => Peeked::EndOfSegment,
        }
    }

    /// Consumes the byte under the cursor. Must follow a `Peeked::Byte`.
    pub(crate) fn bump(&mut self) {
        let b = self.segments[self.seg].bytes()[self.off];
        self.off += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Moves the cursor to the start of the next segment.
    pub(crate) fn advance_segment(&mut self) {
        self.seg += 1;
        self.off = 0;
    }

    /// Byte offset of the cursor inside the current segment.
    pub(crate) fn offset(&self) -> usize {
        self.off
    }

    /// The span `[from..cursor]` of the current segment. Borrowed segments
    /// yield a `'buf` slice; copied segments yield owned bytes, since the
    /// chain's storage does not carry the `'buf` lifetime.
    pub(crate) fn span_from(&self, from: usize) -> Cow<'buf, [u8]> {
        let Some(segment) = self.segments.get(self.seg) else {
            return Cow::Borrowed(&[]);
        };
        match segment {
            Segment::Borrowed(s) => Cow::Borrowed(&s[from..self.off]),
            Segment::Copied(b) => Cow::Owned(b[from..self.off].to_vec()),
        }
    }

    /// A short window of input ending at the cursor, for error reports.
    pub(crate) fn context_snippet(&self) -> &[u8] {
        let idx = self.seg.min(self.segments.len().saturating_sub(1));
        let Some(segment) = self.segments.get(idx) else {
            return &[];
        };
        let bytes = segment.bytes();
        let end = self.off.min(bytes.len());
        let start = end.saturating_sub(24);
        &bytes[start..end]
    }
}
