//! Byte ranges over the logical input.
//!
//! - [`ByteRange`] - `(offset, size)` window assigned to one scan
//! - [`partition_consecutive`] - Balanced consecutive partition of an input

use std::fmt;

use crate::error::SplitError;

/// An `(offset, size)` window over the logical input.
///
/// A range may extend past the end of the input; scans clip it to the
/// input's true length first. A zero-size range is valid and always yields no
/// records.
///
/// # Example
///
/// ```
/// use splitrs::ByteRange;
///
/// let range = ByteRange::new(4, 10);
/// assert_eq!(range.end(), 14);
/// assert_eq!(range.clip(8), ByteRange::new(4, 4));
/// assert!(range.clip(2).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteRange {
    offset: u64,
    size: u64,
}

impl ByteRange {
    /// Creates a range starting at `offset` spanning `size` bytes.
    pub const fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// The range covering an entire input of `len` bytes.
    pub const fn whole(len: u64) -> Self {
        Self::new(0, len)
    }

    /// Returns the first byte offset of the range.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the declared size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the exclusive end offset, saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }

    /// Returns true if the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns true if `pos` lies inside the range.
    pub fn contains(&self, pos: u64) -> bool {
        self.offset <= pos && pos < self.end()
    }

    /// Clips the range to an input of `len` bytes.
    ///
    /// A range that starts at or past `len` becomes a zero-size range at its
    /// original offset.
    pub fn clip(&self, len: u64) -> Self {
        if self.offset >= len {
            return Self::new(self.offset, 0);
        }
        Self::new(self.offset, self.end().min(len) - self.offset)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}

/// Divides `[0, total_length)` into `n` contiguous ranges.
///
/// Ranges are in increasing offset order, never overlap, and their union is
/// exactly `[0, total_length)`. Sizes differ by at most one byte; when
/// `n > total_length` the trailing ranges have size zero.
///
/// # Errors
///
/// Returns [`SplitError::InvalidArgument`] if `n == 0`.
///
/// # Example
///
/// ```
/// use splitrs::{partition_consecutive, ByteRange};
///
/// let ranges = partition_consecutive(10, 3)?;
/// assert_eq!(
///     ranges,
///     vec![ByteRange::new(0, 4), ByteRange::new(4, 3), ByteRange::new(7, 3)]
/// );
/// # Ok::<(), splitrs::SplitError>(())
/// ```
pub fn partition_consecutive(total_length: u64, n: usize) -> Result<Vec<ByteRange>, SplitError> {
    if n == 0 {
        return Err(SplitError::InvalidArgument {
            message: "partition count must be non-zero",
        });
    }

    let count = n as u64;
    let base = total_length / count;
    let remainder = total_length % count;

    let mut ranges = Vec::with_capacity(n);
    let mut offset = 0u64;
    for i in 0..count {
        let size = base + u64::from(i < remainder);
        ranges.push(ByteRange::new(offset, size));
        offset += size;
    }

    debug_assert_eq!(offset, total_length);
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers_input() {
        for total in 0..40u64 {
            for n in 1..12usize {
                let ranges = partition_consecutive(total, n).unwrap();
                assert_eq!(ranges.len(), n);

                let mut expected_offset = 0;
                for range in &ranges {
                    assert_eq!(range.offset(), expected_offset);
                    expected_offset = range.end();
                }
                assert_eq!(expected_offset, total);

                let max = ranges.iter().map(|r| r.size()).max().unwrap();
                let min = ranges.iter().map(|r| r.size()).min().unwrap();
                assert!(max - min <= 1, "unbalanced partition {:?}", ranges);
            }
        }
    }

    #[test]
    fn test_partition_more_ranges_than_bytes() {
        let ranges = partition_consecutive(2, 4).unwrap();
        assert_eq!(
            ranges,
            vec![
                ByteRange::new(0, 1),
                ByteRange::new(1, 1),
                ByteRange::new(2, 0),
                ByteRange::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_partition_zero_count() {
        assert!(matches!(
            partition_consecutive(10, 0),
            Err(SplitError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_clip() {
        assert_eq!(ByteRange::new(2, 5).clip(10), ByteRange::new(2, 5));
        assert_eq!(ByteRange::new(2, 50).clip(10), ByteRange::new(2, 8));
        assert_eq!(ByteRange::new(10, 5).clip(10), ByteRange::new(10, 0));
        assert_eq!(ByteRange::new(12, 5).clip(10), ByteRange::new(12, 0));
        assert_eq!(ByteRange::new(u64::MAX - 1, 5).end(), u64::MAX);
    }

    #[test]
    fn test_contains() {
        let range = ByteRange::new(3, 2);
        assert!(!range.contains(2));
        assert!(range.contains(3));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert!(!ByteRange::new(3, 0).contains(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(ByteRange::new(4, 6).to_string(), "[4, 10)");
    }
}
