//! Blocking record iterator over a reader.

use std::collections::VecDeque;
use std::io::Read;

use bytes::Bytes;

use super::Splitter;
use crate::buffer::Buffer;
use crate::error::SplitError;
use crate::record::Record;

/// An iterator that yields records from a reader.
///
/// `RecordIter` reads the source lazily, `read_size` bytes at a time, and
/// yields each record as soon as its delimiter has been read. After the
/// reader reports end of stream the final record is yielded, then `None`.
///
/// An I/O error is yielded once and ends the iteration.
///
/// # Example
///
/// ```no_run
/// use splitrs::{Delimiter, Splitter};
/// use std::fs::File;
///
/// let file = File::open("data.log")?;
/// let splitter = Splitter::new(Delimiter::try_from("\n")?);
///
/// for record in splitter.split_reader(file) {
///     let record = record?;
///     println!("{}", record);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RecordIter<R> {
    reader: R,
    splitter: Splitter,
    buffer: Buffer,
    ready: VecDeque<Record>,
    finished: bool,
}

impl<R: Read> RecordIter<R> {
    pub(crate) fn new(reader: R, splitter: Splitter, read_size: usize) -> Self {
        Self {
            reader,
            splitter,
            buffer: Buffer::take(read_size),
            ready: VecDeque::new(),
            finished: false,
        }
    }

    /// Returns the stream offset where the next unread record starts.
    pub fn offset(&self) -> u64 {
        self.ready
            .front()
            .map_or(self.splitter.offset(), |record| record.offset)
    }
}

impl<R: Read> Iterator for RecordIter<R> {
    type Item = Result<Record, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }

            match self.buffer.read_from(&mut self.reader) {
                Ok([]) => {
                    self.finished = true;
                    self.ready.extend(self.splitter.finish());
                }
                Ok(filled) => {
                    let data = Bytes::copy_from_slice(filled);
                    self.ready.extend(self.splitter.push(data));
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
