//! The validated delimiter and its precomputed matching tables.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::SplitError;

/// Longest delimiter that gets a dense transition table.
///
/// The table holds `len * 256` one-byte entries, so 255 bytes keeps it under
/// 64 KiB. Longer delimiters fall back to the failure function.
pub const DENSE_TABLE_MAX_LEN: usize = 255;

#[derive(Debug)]
struct Tables {
    /// `failure[i]`: length of the longest proper border of `bytes[..=i]`.
    failure: Vec<usize>,

    /// Row-major `[state][byte] -> next state`, where `len` means "matched".
    dense: Option<Vec<u8>>,
}

/// A non-empty literal byte sequence that separates records.
///
/// Cloning is cheap: the bytes and tables are shared.
///
/// # Example
///
/// ```
/// use splitrs::Delimiter;
///
/// let delimiter = Delimiter::new(&b"::"[..])?;
/// assert_eq!(delimiter.len(), 2);
/// assert!(delimiter.is_self_overlapping());
///
/// assert!(Delimiter::new(&b""[..]).is_err());
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Clone)]
pub struct Delimiter {
    bytes: Bytes,
    tables: Arc<Tables>,
}

impl Delimiter {
    /// Creates a delimiter from a byte sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidArgument`] if `bytes` is empty.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, SplitError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SplitError::InvalidArgument {
                message: "delimiter must not be empty",
            });
        }

        let failure = failure_function(&bytes);
        let dense = (bytes.len() <= DENSE_TABLE_MAX_LEN).then(|| dense_table(&bytes));

        Ok(Self {
            bytes,
            tables: Arc::new(Tables { failure, dense }),
        })
    }

    /// Returns the delimiter bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the delimiter length in bytes (always at least 1).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if a suffix of the delimiter is also a prefix of it
    /// (`"::"`, `"abab"`).
    ///
    /// Under reset-after-match semantics the match positions of such a
    /// delimiter depend on everything before them, not just the last
    /// `len()` bytes.
    pub fn is_self_overlapping(&self) -> bool {
        self.tables.failure.last().is_some_and(|&border| border > 0)
    }

    pub(crate) fn first_byte(&self) -> u8 {
        self.bytes[0]
    }

    /// How many bytes before an offset determine the matcher phase there.
    ///
    /// `None` means the whole prefix is needed.
    pub(crate) fn sync_window(&self) -> Option<usize> {
        if self.is_self_overlapping() {
            None
        } else {
            Some(self.len())
        }
    }

    /// Advances a phase by one byte.
    ///
    /// A phase is a partial-match length in `0..len`, or `len` when a match
    /// ended on the previous byte. `len` transitions exactly like `0`: a
    /// completed match is never reused as the prefix of the next one.
    #[inline]
    pub(crate) fn advance(&self, phase: usize, byte: u8) -> usize {
        let len = self.bytes.len();
        debug_assert!(phase <= len, "phase {} out of range", phase);
        let state = if phase == len { 0 } else { phase };

        if let Some(dense) = &self.tables.dense {
            return dense[state * 256 + byte as usize] as usize;
        }

        let failure = &self.tables.failure;
        let mut state = state;
        loop {
            if self.bytes[state] == byte {
                return state + 1;
            }
            if state == 0 {
                return 0;
            }
            state = failure[state - 1];
        }
    }
}

impl PartialEq for Delimiter {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Delimiter {}

impl Hash for Delimiter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delimiter")
            .field("bytes", &self.bytes)
            .field("self_overlapping", &self.is_self_overlapping())
            .finish()
    }
}

impl TryFrom<&str> for Delimiter {
    type Error = SplitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl TryFrom<&[u8]> for Delimiter {
    type Error = SplitError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::new(Bytes::copy_from_slice(value))
    }
}

fn failure_function(pattern: &[u8]) -> Vec<usize> {
    let mut failure = vec![0usize; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = failure[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        failure[i] = k;
    }
    failure
}

fn dense_table(pattern: &[u8]) -> Vec<u8> {
    let len = pattern.len();
    let mut table = vec![0u8; len * 256];
    table[pattern[0] as usize] = 1;

    // `restart` is the state reached after reading pattern[1..j].
    let mut restart = 0usize;
    for j in 1..len {
        let (done, rest) = table.split_at_mut(j * 256);
        rest[..256].copy_from_slice(&done[restart * 256..restart * 256 + 256]);
        rest[pattern[j] as usize] = (j + 1) as u8;
        restart = done[restart * 256 + pattern[j] as usize] as usize;
    }
    table
}
