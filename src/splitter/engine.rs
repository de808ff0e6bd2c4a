//! Core splitting engine - Splitter with streaming API.
//!
//! This module implements whole-input splitting over a byte stream that
//! arrives in pieces:
//!
//! - [`Splitter`] - Stateful engine that processes streaming bytes
//! - `push()` - Feed data in any size (1 byte, 8KB, 1MB, etc.)
//! - `finish()` - Flush the final record when the stream ends
//!
//! # Example
//!
//! ```
//! use splitrs::{Delimiter, Splitter};
//! use bytes::Bytes;
//!
//! let mut splitter = Splitter::new(Delimiter::try_from("\n")?);
//!
//! let mut records = splitter.push(Bytes::from_static(b"first\nsec"));
//! records.extend(splitter.push(Bytes::from_static(b"ond\nthird")));
//! records.extend(splitter.finish());
//!
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[1].data, &b"second\n"[..]);
//! # Ok::<(), splitrs::SplitError>(())
//! ```

use std::io::Read;

use bytes::{Bytes, BytesMut};

use super::RecordIter;
use crate::config::{SplitConfig, DEFAULT_CHUNK_SIZE};
use crate::matcher::{Delimiter, DelimiterMatcher};
use crate::record::Record;

/// A splitter that turns streaming bytes into delimiter-terminated records.
///
/// `Splitter` keeps the matcher state and the bytes of the unfinished record
/// across calls, so record boundaries never depend on how the stream was cut
/// into pushes.
///
/// The records of a complete stream are exactly the records a whole-input
/// [`SplitCoordinator::split`](crate::SplitCoordinator::split) produces for
/// the same bytes, including the empty record after a trailing delimiter.
///
/// # Zero-Copy
///
/// A record that lies entirely inside one pushed `Bytes` is a slice of it.
/// Records spanning several pushes are copied once.
#[derive(Debug, Clone)]
pub struct Splitter {
    matcher: DelimiterMatcher,
    pending: BytesMut,
    offset: u64,
    seen_input: bool,
    read_size: usize,
}

impl Splitter {
    /// Creates a new splitter for `delimiter`.
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            matcher: DelimiterMatcher::new(delimiter),
            pending: BytesMut::new(),
            offset: 0,
            seen_input: false,
            read_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Creates a splitter that reads `config.chunk_size()` bytes at a time
    /// in [`split_reader`](Self::split_reader).
    pub fn with_config(delimiter: Delimiter, config: &SplitConfig) -> Self {
        Self {
            read_size: config.chunk_size().max(1),
            ..Self::new(delimiter)
        }
    }

    /// Pushes data into the splitter and returns the records it completes.
    ///
    /// Bytes after the last delimiter are held until a later push or
    /// [`finish`](Self::finish).
    pub fn push(&mut self, data: Bytes) -> Vec<Record> {
        let mut records = Vec::new();
        if data.is_empty() {
            return records;
        }
        self.seen_input = true;

        let mut start = 0;
        let mut pos = 0;
        while let Some(n) = self.matcher.find_match(&data[pos..]) {
            pos += n;
            let record_data = if self.pending.is_empty() {
                data.slice(start..pos)
            } else {
                self.pending.extend_from_slice(&data[start..pos]);
                self.pending.split().freeze()
            };

            let record = Record::new(record_data, self.offset);
            self.offset = record.end();
            records.push(record);
            start = pos;
        }

        // Held bytes only grow by appending and are frozen when the record closes.
        self.pending.extend_from_slice(&data[start..]);

        records
    }

    /// Ends the stream and returns the final record.
    ///
    /// The final record holds the bytes after the last delimiter and is empty
    /// when the stream ended on a delimiter. Returns `None` only if no bytes
    /// were pushed at all. The splitter is reset afterwards and can be reused
    /// for a new stream.
    pub fn finish(&mut self) -> Option<Record> {
        let record = self
            .seen_input
            .then(|| Record::new(self.pending.split().freeze(), self.offset));
        self.reset();
        record
    }

    /// Splits a complete in-memory input.
    ///
    /// # Example
    ///
    /// ```
    /// use splitrs::{Delimiter, Splitter};
    ///
    /// let mut splitter = Splitter::new(Delimiter::try_from("::")?);
    /// let records = splitter.split_bytes(&b"a::b::"[..]);
    ///
    /// let offsets: Vec<u64> = records.iter().map(|r| r.offset).collect();
    /// assert_eq!(offsets, vec![0, 3, 6]);
    /// assert!(records[2].is_empty());
    /// # Ok::<(), splitrs::SplitError>(())
    /// ```
    pub fn split_bytes(&mut self, data: impl Into<Bytes>) -> Vec<Record> {
        self.reset();
        let mut records = self.push(data.into());
        records.extend(self.finish());
        records
    }

    /// Creates a record iterator over a reader.
    ///
    /// # Example
    ///
    /// ```
    /// use splitrs::{Delimiter, Splitter};
    /// use std::io::Cursor;
    ///
    /// let splitter = Splitter::new(Delimiter::try_from(";")?);
    /// let records = splitter
    ///     .split_reader(Cursor::new(b"a;bb;ccc"))
    ///     .collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 3);
    /// # Ok::<(), splitrs::SplitError>(())
    /// ```
    pub fn split_reader<R: Read>(mut self, reader: R) -> RecordIter<R> {
        self.reset();
        let read_size = self.read_size;
        RecordIter::new(reader, self, read_size)
    }

    /// Resets the splitter for a new stream.
    pub fn reset(&mut self) {
        self.matcher.reset();
        self.pending.clear();
        self.offset = 0;
        self.seen_input = false;
    }

    /// Returns the stream offset where the next record starts.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the number of bytes held for the unfinished record.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the delimiter.
    pub fn delimiter(&self) -> &Delimiter {
        self.matcher.delimiter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(delimiter: &str) -> Splitter {
        Splitter::new(Delimiter::try_from(delimiter).unwrap())
    }

    fn push_in_pieces(delimiter: &str, input: &[u8], piece: usize) -> Vec<Record> {
        let mut s = splitter(delimiter);
        let mut records = Vec::new();
        for part in input.chunks(piece) {
            records.extend(s.push(Bytes::copy_from_slice(part)));
        }
        records.extend(s.finish());
        records
    }

    #[test]
    fn test_empty_stream() {
        let mut s = splitter(":");
        assert!(s.push(Bytes::new()).is_empty());
        assert!(s.finish().is_none());
    }

    #[test]
    fn test_trailing_delimiter() {
        let records = splitter(":").split_bytes(&b"abc:def:"[..]);
        let data: Vec<&[u8]> = records.iter().map(|r| r.data.as_ref()).collect();
        assert_eq!(data, vec![&b"abc:"[..], &b"def:"[..], &b""[..]]);
        assert_eq!(records[2].offset, 8);
    }

    #[test]
    fn test_push_size_independence() {
        let input = b"aa::|b::|::|::c:|:::|";
        let expected = push_in_pieces("::|", input, input.len());
        for piece in 1..input.len() {
            assert_eq!(push_in_pieces("::|", input, piece), expected, "piece {}", piece);
        }
    }

    #[test]
    fn test_record_spanning_pushes() {
        let mut s = splitter("...:|");
        assert!(s.push(Bytes::from_static(b"abc...")).is_empty());
        assert_eq!(s.pending_len(), 6);

        let records = s.push(Bytes::from_static(b":|de"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, &b"abc...:|"[..]);
        assert_eq!(s.offset(), 8);
        assert_eq!(s.pending_len(), 2);

        let last = s.finish().unwrap();
        assert_eq!(last.data, &b"de"[..]);
        assert_eq!(last.offset, 8);
    }

    #[test]
    fn test_long_record_in_small_pushes() {
        const TOTAL: usize = 6 * 1024 * 1024;
        let piece = Bytes::from(vec![b'x'; 4096]);

        let mut s = splitter("\r\n");
        for _ in 0..TOTAL / piece.len() {
            assert!(s.push(piece.clone()).is_empty());
        }
        assert_eq!(s.pending_len(), TOTAL);

        let last = s.finish().unwrap();
        assert_eq!(last.len(), TOTAL);
        assert_eq!(last.offset, 0);
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn test_long_record_closed_by_delimiter() {
        const TOTAL: usize = 6 * 1024 * 1024;
        let piece = Bytes::from(vec![b'x'; 4096]);

        let mut s = splitter("\r\n");
        for _ in 0..TOTAL / piece.len() {
            assert!(s.push(piece.clone()).is_empty());
        }
        let records = s.push(Bytes::from_static(b"\r\ntail"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), TOTAL + 2);
        assert_eq!(records[0].offset, 0);
        assert!(records[0].data.ends_with(b"\r\n"));

        let last = s.finish().unwrap();
        assert_eq!(last.data, &b"tail"[..]);
        assert_eq!(last.offset, TOTAL as u64 + 2);
    }

    #[test]
    fn test_finish_resets() {
        let mut s = splitter(":");
        s.push(Bytes::from_static(b"a:b"));
        assert!(s.finish().is_some());
        assert_eq!(s.offset(), 0);
        assert!(s.finish().is_none());
    }

    #[test]
    fn test_self_overlapping_stream() {
        let records = splitter("::").split_bytes(&b":::::"[..]);
        let spans: Vec<(u64, u64)> = records.iter().map(|r| (r.start(), r.end())).collect();
        assert_eq!(spans, vec![(0, 2), (2, 4), (4, 5)]);
    }
}
