//! Source locations.
//!
//! A [`Span`] is a byte-offset range into the LA source text. Tokens
//! carry spans; diagnostics are attributed to lines, so [`Span::line`]
//! converts an offset back into a 1-based line number by counting
//! newlines. Offsets match Rust slicing: `&source[span.start..span.end]`
//! is the spanned text.

/// A byte-offset range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First byte (inclusive).
    pub start: usize,
    /// Past the last byte (exclusive).
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Covers from the start of `self` to the end of `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// 1-based line number of the span's start within `source`.
    ///
    /// Counts newlines before `start`; an offset past the end of `source`
    /// reports the last line.
    pub fn line(&self, source: &str) -> u32 {
        let upto = self.start.min(source.len());
        1 + source.as_bytes()[..upto]
            .iter()
            .filter(|&&b| b == b'\n')
            .count() as u32
    }

    /// 1-based column of the span's start within `source`.
    ///
    /// Measured in bytes from the last newline. Together with [`Span::line`]
    /// this gives a deterministic position for synthesized names.
    pub fn column(&self, source: &str) -> u32 {
        let upto = self.start.min(source.len());
        let line_start = source.as_bytes()[..upto]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        (upto - line_start) as u32 + 1
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
