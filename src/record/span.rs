//! Record spans over the logical input.

use std::fmt;
use std::ops::Range;

/// A record as a half-open byte span `[start, end)` over the input.
///
/// The span includes the record's trailing delimiter, if it has one. The
/// trailing record of an input that ends on a delimiter is the empty span
/// `[len, len)`.
///
/// # Example
///
/// ```
/// use splitrs::RecordSpan;
///
/// let span = RecordSpan::new(4, 7);
/// assert_eq!(span.len(), 3);
/// assert_eq!(span.slice(b"abc:def"), b"def");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordSpan {
    start: u64,
    end: u64,
}

impl RecordSpan {
    /// Creates a span. `start` must not exceed `end`.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "record span [{}, {}) is inverted", start, end);
        Self { start, end }
    }

    /// Returns the first byte offset.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the exclusive end offset.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Returns the record length in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns true for the empty trailing record.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the span as a range.
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }

    /// Returns the record bytes out of the full input.
    ///
    /// # Panics
    ///
    /// Panics if the span lies outside `input`.
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }
}

impl From<RecordSpan> for Range<u64> {
    fn from(span: RecordSpan) -> Self {
        span.range()
    }
}

impl fmt::Display for RecordSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
