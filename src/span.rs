//! Inclusive byte ranges
//!
//! The whole engine speaks in inclusive ranges: a span `[a, b]` covers
//! `b - a + 1` bytes. A span with `end < start` is degenerate (length 0).
//! The allocator's trailing free span can be degenerate when a section is
//! full; callers must tolerate that.

use std::fmt;

/// An inclusive range of byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte covered (inclusive)
    pub start: u32,

    /// Last byte covered (inclusive)
    pub end: u32,
}

impl Span {
    /// Create a span covering `[start, end]`
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span covering `len` bytes starting at `start`
    pub fn with_len(start: u32, len: u32) -> Self {
        debug_assert!(len > 0, "with_len requires a non-zero length");
        Self {
            start,
            end: start + len - 1,
        }
    }

    /// Number of bytes covered; 0 for a degenerate span
    pub fn len(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// True if this span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first `len` bytes of this span
    pub fn prefix(&self, len: u32) -> Span {
        debug_assert!(len <= self.len());
        Span::with_len(self.start, len)
    }

    /// The same span shifted right by `offset`
    /// (e.g. section-relative to absolute)
    pub fn shift(&self, offset: u32) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// True if the two spans share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
