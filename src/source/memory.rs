//! In-memory chunk source.

use bytes::Bytes;

use super::{ChunkCursor, ChunkSource};
use crate::error::SplitError;
use crate::record::RecordSpan;

/// A source over bytes already in memory.
///
/// Chunks are zero-copy slices of the original buffer, and cursors are
/// independent, so any number of scans can read it concurrently.
///
/// # Example
///
/// ```
/// use splitrs::{split, MemorySource};
///
/// let source = MemorySource::new(&b"abc:def"[..]);
/// let spans = split(&source, b":", None)?;
/// let records = source.records(&spans);
///
/// assert_eq!(records, vec![&b"abc:"[..], &b"def"[..]]);
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    /// Wraps a buffer.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Returns the whole buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Returns the bytes of one record without copying.
    ///
    /// # Panics
    ///
    /// Panics if the span lies outside the buffer.
    pub fn slice(&self, span: RecordSpan) -> Bytes {
        self.data.slice(span.start() as usize..span.end() as usize)
    }

    /// Materializes a record list.
    pub fn records(&self, spans: &[RecordSpan]) -> Vec<Bytes> {
        spans.iter().map(|&span| self.slice(span)).collect()
    }
}

impl ChunkSource for MemorySource {
    type Cursor = MemoryCursor;

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn open_at(&self, offset: u64) -> Result<Self::Cursor, SplitError> {
        if offset > self.len() {
            return Err(SplitError::OutOfBounds {
                offset,
                len: self.len(),
            });
        }
        Ok(MemoryCursor {
            remaining: self.data.slice(offset as usize..),
        })
    }
}

/// Cursor over a [`MemorySource`].
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    remaining: Bytes,
}

impl ChunkCursor for MemoryCursor {
    fn read_chunk(&mut self, max_size: usize) -> Result<Option<Bytes>, SplitError> {
        if self.remaining.is_empty() || max_size == 0 {
            return Ok(None);
        }
        let take = max_size.min(self.remaining.len());
        Ok(Some(self.remaining.split_to(take)))
    }
}
