//! Entry phase synchronization.
//!
//! The matcher phase at a range's first byte is a partial-match length, or the
//! delimiter length when a match ends exactly there. Without a proper border
//! the phase only depends on the `len` bytes before the offset. A
//! self-overlapping delimiter needs the whole prefix.

use tracing::debug;

use crate::error::SplitError;
use crate::matcher::Delimiter;
#[cfg(feature = "parallel")]
use crate::matcher::{Multistate, TransitionSummary};
use crate::range::ByteRange;
use crate::source::{ChunkCursor, ChunkSource};

/// Computes the matcher phase at `offset` from the bytes before it.
pub(crate) fn entry_phase<S: ChunkSource + ?Sized>(
    source: &S,
    delimiter: &Delimiter,
    offset: u64,
    chunk_size: usize,
) -> Result<usize, SplitError> {
    if offset == 0 {
        return Ok(0);
    }

    let start = match delimiter.sync_window() {
        Some(window) => offset.saturating_sub(window as u64),
        None => {
            debug!(offset, "self-overlapping delimiter, synchronizing from input start");
            0
        }
    };

    let mut phase = 0;
    read_exact_range(source, ByteRange::new(start, offset - start), chunk_size, |chunk| {
        for &byte in chunk {
            phase = delimiter.advance(phase, byte);
        }
    })?;
    Ok(phase)
}

/// Computes the phase at each of `offsets` (ascending) in one pass from 0.
pub(crate) fn phases_at<S: ChunkSource + ?Sized>(
    source: &S,
    delimiter: &Delimiter,
    offsets: &[u64],
    chunk_size: usize,
) -> Result<Vec<usize>, SplitError> {
    debug_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));

    let mut phases = Vec::with_capacity(offsets.len());
    let mut phase = 0;
    let mut pos = 0u64;
    for &offset in offsets {
        read_exact_range(source, ByteRange::new(pos, offset - pos), chunk_size, |chunk| {
            for &byte in chunk {
                phase = delimiter.advance(phase, byte);
            }
        })?;
        pos = offset;
        phases.push(phase);
    }
    Ok(phases)
}

/// Summarizes how `segment` maps entry phases to exit phases.
#[cfg(feature = "parallel")]
pub(crate) fn summarize<S: ChunkSource + ?Sized>(
    source: &S,
    delimiter: &Delimiter,
    segment: ByteRange,
    chunk_size: usize,
) -> Result<TransitionSummary, SplitError> {
    let mut multistate = Multistate::new(delimiter);
    read_exact_range(source, segment, chunk_size, |chunk| multistate.feed(chunk))?;
    debug!(
        segment = %segment,
        live_heads = multistate.live_heads(),
        "segment summarized"
    );
    Ok(multistate.finish())
}

/// Streams exactly the bytes of `range` into `f`.
fn read_exact_range<S, F>(
    source: &S,
    range: ByteRange,
    chunk_size: usize,
    mut f: F,
) -> Result<(), SplitError>
where
    S: ChunkSource + ?Sized,
    F: FnMut(&[u8]),
{
    if range.is_empty() {
        return Ok(());
    }

    let mut cursor = source.open_at(range.offset())?;
    let mut pos = range.offset();
    while pos < range.end() {
        let want = (range.end() - pos).min(chunk_size as u64) as usize;
        let Some(chunk) = cursor.read_chunk(want)? else {
            return Err(SplitError::length_mismatch(
                pos,
                "source ended before its declared length",
            ));
        };
        if chunk.is_empty() || chunk.len() > want {
            return Err(SplitError::length_mismatch(
                pos,
                "source returned a chunk of the wrong size",
            ));
        }
        f(&chunk);
        pos += chunk.len() as u64;
    }
    Ok(())
}
