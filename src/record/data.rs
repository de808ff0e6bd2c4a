//! The Record type - record bytes produced by the streaming splitters.

use bytes::Bytes;
use std::fmt;

use super::RecordSpan;

/// A record with its data and position in the original stream.
///
/// `data` includes the trailing delimiter, except for the final record of a
/// stream that does not end on one.
///
/// # Example
///
/// ```
/// use splitrs::Record;
/// use bytes::Bytes;
///
/// let record = Record::new(Bytes::from_static(b"abc:"), 0);
///
/// assert_eq!(record.len(), 4);
/// assert_eq!(record.end(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The record bytes (zero-copy when the record came from a single push).
    pub data: Bytes,

    /// The offset of the first byte in the original stream.
    pub offset: u64,
}

impl Record {
    /// Creates a record starting at `offset`.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
        }
    }

    /// Returns the length of the record data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the record has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the record data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the start offset.
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the span this record covers.
    pub fn span(&self) -> RecordSpan {
        RecordSpan::new(self.start(), self.end())
    }

    /// Consumes the record and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({} bytes @ {})", self.len(), self.offset)
    }
}
