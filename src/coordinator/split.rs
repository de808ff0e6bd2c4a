//! Range ordering, entry phase computation and result assembly.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use super::CancelToken;
use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::matcher::Delimiter;
use crate::range::{partition_consecutive, ByteRange};
use crate::record::RecordSpan;
use crate::scan::{phases_at, RangeScanner};
use crate::source::ChunkSource;

/// Splits a source into records over caller-chosen byte ranges.
///
/// Results are partition invariant: for any consecutive partition of the
/// input, concatenating the per-range records in offset order gives exactly
/// the records of a whole-input split.
///
/// # Example
///
/// ```
/// use splitrs::{partition_consecutive, MemorySource, SplitConfig, SplitCoordinator};
///
/// let source = MemorySource::new(&b"0:1:2:3:4:"[..]);
/// let coordinator = SplitCoordinator::new(b":", SplitConfig::default())?;
///
/// let whole = coordinator.split(&source, None)?;
/// let ranges = partition_consecutive(10, 3)?;
/// assert_eq!(coordinator.split_ranges(&source, &ranges)?, whole);
/// assert_eq!(whole.len(), 6);
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SplitCoordinator {
    delimiter: Delimiter,
    config: SplitConfig,
    cancel: Option<CancelToken>,
}

impl SplitCoordinator {
    /// Creates a coordinator for a delimiter given as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidArgument`] if the delimiter is empty or
    /// the configuration is invalid.
    pub fn new(delimiter: impl AsRef<[u8]>, config: SplitConfig) -> Result<Self, SplitError> {
        Self::with_delimiter(Delimiter::try_from(delimiter.as_ref())?, config)
    }

    /// Creates a coordinator for an already validated delimiter.
    pub fn with_delimiter(delimiter: Delimiter, config: SplitConfig) -> Result<Self, SplitError> {
        config.validate()?;
        Ok(Self {
            delimiter,
            config,
            cancel: None,
        })
    }

    /// Attaches a cancel token polled by every scan.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the delimiter.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Splits one range, or the whole input when `range` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::SourceRead`] on source failure and
    /// [`SplitError::Cancelled`] if the cancel token fires.
    pub fn split<S>(
        &self,
        source: &S,
        range: Option<ByteRange>,
    ) -> Result<Vec<RecordSpan>, SplitError>
    where
        S: ChunkSource + ?Sized,
    {
        let range = range.unwrap_or(ByteRange::whole(source.len()));
        debug!(
            input_len = source.len(),
            range = %range,
            delimiter_len = self.delimiter.len(),
            "splitting range"
        );

        let records = self.scanner(source).scan(range)?.into_records();
        debug!(records = records.len(), "split finished");
        Ok(records)
    }

    /// Splits several ranges one after another.
    ///
    /// Ranges are processed in offset order and the result is the
    /// concatenation of their records in that order. Entry phases for all
    /// ranges come from a single pass over the input.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidArgument`] if two non-empty ranges
    /// overlap, plus the errors of [`split`](Self::split).
    pub fn split_ranges<S>(
        &self,
        source: &S,
        ranges: &[ByteRange],
    ) -> Result<Vec<RecordSpan>, SplitError>
    where
        S: ChunkSource + ?Sized,
    {
        let ordered = order_ranges(ranges, source.len())?;
        debug!(
            input_len = source.len(),
            ranges = ordered.len(),
            self_overlapping = self.delimiter.is_self_overlapping(),
            "splitting ranges sequentially"
        );

        let entries = match self.delimiter.sync_window() {
            Some(_) => ordered
                .iter()
                .map(|r| self.windowed_entry(source, *r))
                .collect::<Result<Vec<_>, _>>()?,
            None => self.prefix_entries(source, &ordered)?,
        };

        let scanner = self.scanner(source);
        let mut records = Vec::new();
        for (range, entry) in ordered.iter().zip(entries) {
            records.extend(scanner.scan_with_entry(*range, entry)?.records());
        }

        debug!(records = records.len(), "split finished");
        Ok(records)
    }

    /// Splits several ranges on the rayon thread pool.
    ///
    /// Produces the same records as [`split_ranges`](Self::split_ranges).
    /// For a self-overlapping delimiter the entry phases are computed by
    /// summarizing the segments between range offsets in parallel and
    /// composing the summaries in order.
    #[cfg(feature = "parallel")]
    pub fn split_parallel<S>(
        &self,
        source: &S,
        ranges: &[ByteRange],
    ) -> Result<Vec<RecordSpan>, SplitError>
    where
        S: ChunkSource + Sync + ?Sized,
    {
        let ordered = order_ranges(ranges, source.len())?;
        debug!(
            input_len = source.len(),
            ranges = ordered.len(),
            threads = rayon::current_num_threads(),
            self_overlapping = self.delimiter.is_self_overlapping(),
            "splitting ranges in parallel"
        );

        let entries = match self.delimiter.sync_window() {
            Some(_) => ordered
                .par_iter()
                .map(|r| self.windowed_entry(source, *r))
                .collect::<Result<Vec<_>, _>>()?,
            None => self.summarized_entries(source, &ordered)?,
        };

        let scanner = self.scanner(source);
        let scans = ordered
            .par_iter()
            .zip(entries.par_iter())
            .map(|(range, &entry)| scanner.scan_with_entry(*range, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let records: Vec<RecordSpan> = scans.iter().flat_map(|scan| scan.records()).collect();
        debug!(records = records.len(), "split finished");
        Ok(records)
    }

    /// Partitions the input into `config.parallelism()` consecutive ranges
    /// and splits them, in parallel when the `parallel` feature is enabled.
    pub fn split_partitioned<S>(&self, source: &S) -> Result<Vec<RecordSpan>, SplitError>
    where
        S: ChunkSource + Sync + ?Sized,
    {
        let ranges = partition_consecutive(source.len(), self.config.parallelism())?;

        #[cfg(feature = "parallel")]
        {
            self.split_parallel(source, &ranges)
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.split_ranges(source, &ranges)
        }
    }

    fn scanner<'a, S: ChunkSource + ?Sized>(&self, source: &'a S) -> RangeScanner<'a, S> {
        let scanner = RangeScanner::new(source, self.delimiter.clone(), &self.config);
        match &self.cancel {
            Some(token) => scanner.with_cancel_token(token.clone()),
            None => scanner,
        }
    }

    fn check_cancelled(&self) -> Result<(), SplitError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(SplitError::Cancelled),
            _ => Ok(()),
        }
    }

    fn windowed_entry<S>(&self, source: &S, range: ByteRange) -> Result<usize, SplitError>
    where
        S: ChunkSource + ?Sized,
    {
        if range.is_empty() {
            return Ok(0);
        }
        self.check_cancelled()?;
        crate::scan::entry_phase(source, &self.delimiter, range.offset(), self.config.chunk_size())
    }

    fn prefix_entries<S>(&self, source: &S, ordered: &[ByteRange]) -> Result<Vec<usize>, SplitError>
    where
        S: ChunkSource + ?Sized,
    {
        self.check_cancelled()?;

        // Clipped empty ranges may sit past the end of the input.
        let offsets: Vec<u64> = ordered
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.offset())
            .collect();
        let phases = phases_at(source, &self.delimiter, &offsets, self.config.chunk_size())?;
        debug_assert_eq!(phases.len(), offsets.len(), "one phase per non-empty range");
        let mut phases = phases.into_iter();

        ordered
            .iter()
            .map(|range| {
                if range.is_empty() {
                    Ok(0)
                } else {
                    phases.next().ok_or(MISSING_ENTRY)
                }
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn summarized_entries<S>(
        &self,
        source: &S,
        ordered: &[ByteRange],
    ) -> Result<Vec<usize>, SplitError>
    where
        S: ChunkSource + Sync + ?Sized,
    {
        // Cut points are the offsets of the ranges that need an entry phase.
        let mut cuts: Vec<u64> = ordered
            .iter()
            .filter(|r| !r.is_empty() && r.offset() > 0)
            .map(|r| r.offset())
            .collect();
        cuts.dedup();

        let segments: Vec<ByteRange> = cuts
            .iter()
            .scan(0u64, |start, &cut| {
                let segment = ByteRange::new(*start, cut - *start);
                *start = cut;
                Some(segment)
            })
            .collect();

        let summaries = segments
            .par_iter()
            .map(|segment| {
                self.check_cancelled()?;
                crate::scan::summarize(source, &self.delimiter, *segment, self.config.chunk_size())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut phase_at_cut = Vec::with_capacity(cuts.len());
        let mut phase = 0;
        for summary in &summaries {
            phase = summary.apply(phase);
            phase_at_cut.push(phase);
        }

        debug_assert_eq!(phase_at_cut.len(), cuts.len(), "one summary per cut");

        ordered
            .iter()
            .map(|range| {
                if range.is_empty() || range.offset() == 0 {
                    return Ok(0);
                }
                match cuts.binary_search(&range.offset()) {
                    Ok(i) => phase_at_cut.get(i).copied().ok_or(MISSING_ENTRY),
                    Err(_) => {
                        debug_assert!(false, "range offset {} is not a cut", range.offset());
                        Err(MISSING_ENTRY)
                    }
                }
            })
            .collect()
    }
}

/// Returned when entry-phase bookkeeping has no phase for a non-empty range.
const MISSING_ENTRY: SplitError = SplitError::InvalidArgument {
    message: "no entry phase computed for a non-empty range",
};

/// Clips, sorts by offset and checks that no two non-empty ranges overlap.
fn order_ranges(ranges: &[ByteRange], len: u64) -> Result<Vec<ByteRange>, SplitError> {
    let mut ordered: Vec<ByteRange> = ranges.iter().map(|r| r.clip(len)).collect();
    ordered.sort_by_key(|r| r.offset());

    let mut covered_to = 0u64;
    for range in ordered.iter().filter(|r| !r.is_empty()) {
        if range.offset() < covered_to {
            return Err(SplitError::InvalidArgument {
                message: "byte ranges must not overlap",
            });
        }
        covered_to = range.end();
    }
    Ok(ordered)
}

/// Splits `source` on `delimiter` with the default configuration.
///
/// `range` selects a single byte range; `None` splits the whole input.
///
/// # Example
///
/// ```
/// use splitrs::{split, ByteRange, MemorySource};
///
/// let source = MemorySource::new(&b"abc:def:ghi"[..]);
///
/// let whole = split(&source, b":", None)?;
/// assert_eq!(source.records(&whole), vec![&b"abc:"[..], &b"def:"[..], &b"ghi"[..]]);
///
/// let tail = split(&source, b":", Some(ByteRange::new(2, 9)))?;
/// assert_eq!(tail, whole[1..]);
/// # Ok::<(), splitrs::SplitError>(())
/// ```
pub fn split<S>(
    source: &S,
    delimiter: impl AsRef<[u8]>,
    range: Option<ByteRange>,
) -> Result<Vec<RecordSpan>, SplitError>
where
    S: ChunkSource + ?Sized,
{
    SplitCoordinator::new(delimiter, SplitConfig::default())?.split(source, range)
}
