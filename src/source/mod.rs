//! Chunked byte sources.
//!
//! The splitter never sees storage directly. It asks a [`ChunkSource`] for a
//! cursor at some offset and pulls sequential chunks from it. Every scan opens
//! its own cursor, so one source can serve many ranges at once.
//!
//! - [`ChunkSource`] / [`ChunkCursor`] - The source interface
//! - [`MemorySource`] - Zero-copy source over [`bytes::Bytes`]
//! - [`FileSource`] - File on disk; each cursor owns its own handle

mod file;
mod memory;

use bytes::Bytes;

use crate::error::SplitError;

pub use file::{FileCursor, FileSource};
pub use memory::{MemoryCursor, MemorySource};

/// A logical input that can be read from any offset.
pub trait ChunkSource {
    /// Sequential reader returned by [`ChunkSource::open_at`].
    type Cursor: ChunkCursor;

    /// Returns the input length in bytes.
    fn len(&self) -> u64;

    /// Returns true if the input has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Opens a cursor positioned at `offset`.
    ///
    /// Offsets from 0 to `len()` inclusive are valid.
    ///
    /// # Errors
    ///
    /// [`SplitError::OutOfBounds`] for offsets past the end,
    /// [`SplitError::SourceRead`] if the underlying storage cannot be opened.
    fn open_at(&self, offset: u64) -> Result<Self::Cursor, SplitError>;
}

/// Sequential chunk reader over a [`ChunkSource`].
pub trait ChunkCursor {
    /// Reads the next chunk of at most `max_size` bytes.
    ///
    /// Returns `Ok(None)` at end of stream. A returned chunk is never empty.
    fn read_chunk(&mut self, max_size: usize) -> Result<Option<Bytes>, SplitError>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &S {
    type Cursor = S::Cursor;

    fn len(&self) -> u64 {
        (**self).len()
    }

    fn open_at(&self, offset: u64) -> Result<Self::Cursor, SplitError> {
        (**self).open_at(offset)
    }
}
