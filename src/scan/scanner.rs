//! Single-range scanning with lookahead past the range end.

use tracing::trace;

use super::sync::entry_phase;
use crate::config::SplitConfig;
use crate::coordinator::CancelToken;
use crate::error::SplitError;
use crate::matcher::{Delimiter, DelimiterMatcher};
use crate::range::ByteRange;
use crate::record::RecordSpan;
use crate::source::{ChunkCursor, ChunkSource};

/// Splits individual byte ranges of a source.
///
/// Scans of different ranges are independent: each opens its own cursor, so
/// a scanner can be shared across threads when the source is `Sync`.
///
/// # Example
///
/// ```
/// use splitrs::{ByteRange, Delimiter, MemorySource, RangeScanner, SplitConfig};
///
/// let source = MemorySource::new(&b"abc:def:ghi"[..]);
/// let delimiter = Delimiter::try_from(":")?;
/// let scanner = RangeScanner::new(&source, delimiter, &SplitConfig::default());
///
/// // The record starting at 4 runs past the range end to the next delimiter.
/// let scan = scanner.scan(ByteRange::new(2, 4))?;
/// let records: Vec<_> = scan.records().map(|span| span.range()).collect();
/// assert_eq!(records, vec![4..8]);
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug)]
pub struct RangeScanner<'a, S: ?Sized> {
    source: &'a S,
    delimiter: Delimiter,
    chunk_size: usize,
    cancel: Option<CancelToken>,
}

impl<'a, S: ChunkSource + ?Sized> RangeScanner<'a, S> {
    /// Creates a scanner over `source`.
    pub fn new(source: &'a S, delimiter: Delimiter, config: &SplitConfig) -> Self {
        Self {
            source,
            delimiter,
            chunk_size: config.chunk_size().max(1),
            cancel: None,
        }
    }

    /// Aborts scans with [`SplitError::Cancelled`] once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the delimiter being matched.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Scans one range on its own.
    ///
    /// The matcher phase at the range offset is recovered from the bytes
    /// before it. For a self-overlapping delimiter this reads the entire
    /// prefix of the input.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::SourceRead`] if the source fails or delivers a
    /// different number of bytes than its declared length, and
    /// [`SplitError::Cancelled`] if the cancel token fires.
    pub fn scan(&self, range: ByteRange) -> Result<RangeScan, SplitError> {
        let range = range.clip(self.source.len());
        if range.is_empty() {
            return Ok(RangeScan::empty(range));
        }

        self.check_cancelled()?;
        let entry = entry_phase(self.source, &self.delimiter, range.offset(), self.chunk_size)?;
        self.scan_with_entry(range, entry)
    }

    /// Scans one range given the matcher phase at its offset.
    pub(crate) fn scan_with_entry(
        &self,
        range: ByteRange,
        entry: usize,
    ) -> Result<RangeScan, SplitError> {
        let len = self.source.len();
        let range = range.clip(len);
        if range.is_empty() {
            return Ok(RangeScan::empty(range));
        }

        let (offset, end) = (range.offset(), range.end());
        let d = self.delimiter.len();
        debug_assert!(entry <= d);
        debug_assert!(offset != 0 || entry == 0);

        let mut edges = Vec::new();
        if offset == 0 || entry == d {
            edges.push(offset);
        }

        let mut matcher = DelimiterMatcher::with_phase(self.delimiter.clone(), entry);
        let mut cursor = self.source.open_at(offset)?;
        let mut examined = offset;
        let mut terminator = None;

        while terminator.is_none() {
            // Nothing owned and nothing left to own.
            if examined >= end && edges.is_empty() {
                break;
            }

            self.check_cancelled()?;
            let Some(chunk) = cursor.read_chunk(self.chunk_size)? else {
                if examined != len {
                    return Err(SplitError::length_mismatch(
                        examined,
                        "source ended before its declared length",
                    ));
                }
                break;
            };

            let chunk_start = examined;
            let chunk_end = chunk_start + chunk.len() as u64;
            if chunk.is_empty() || chunk_end > len {
                return Err(SplitError::length_mismatch(
                    chunk_start,
                    "source yielded bytes past its declared length",
                ));
            }
            examined = chunk_end;

            let mut i = 0;
            while let Some(n) = matcher.find_match(&chunk[i..]) {
                i += n;
                let boundary = chunk_start + i as u64;
                if boundary < end || (boundary == len && end == len) {
                    edges.push(boundary);
                } else {
                    terminator = Some(boundary);
                    examined = boundary;
                    break;
                }
            }
        }

        if !edges.is_empty() {
            edges.push(terminator.unwrap_or(len));
        }

        trace!(
            range = %range,
            entry,
            records = edges.len().saturating_sub(1),
            lookahead = examined.saturating_sub(end),
            "range scanned"
        );

        Ok(RangeScan {
            range,
            edges,
            scanned_to: examined,
        })
    }

    fn check_cancelled(&self) -> Result<(), SplitError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(SplitError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// The records owned by one byte range.
///
/// Record `i` spans `boundaries()[i]..boundaries()[i + 1]`. The final boundary
/// may lie past the range end: it is where the last owned record was
/// terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeScan {
    range: ByteRange,
    edges: Vec<u64>,
    scanned_to: u64,
}

impl RangeScan {
    fn empty(range: ByteRange) -> Self {
        Self {
            range,
            edges: Vec::new(),
            scanned_to: range.offset(),
        }
    }

    /// Returns the range after clipping to the input length.
    pub fn range(&self) -> ByteRange {
        self.range
    }

    /// Returns the record edges: owned starts followed by the final end.
    ///
    /// Empty when the range owns no records.
    pub fn boundaries(&self) -> &[u64] {
        &self.edges
    }

    /// Returns the offset just past the last byte examined.
    pub fn scanned_to(&self) -> u64 {
        self.scanned_to
    }

    /// Returns the number of records owned by the range.
    pub fn record_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Iterates over the owned records in input order.
    pub fn records(&self) -> impl Iterator<Item = RecordSpan> + '_ {
        self.edges.windows(2).map(|w| RecordSpan::new(w[0], w[1]))
    }

    /// Consumes the scan and returns its records.
    pub fn into_records(self) -> Vec<RecordSpan> {
        self.records().collect()
    }
}
