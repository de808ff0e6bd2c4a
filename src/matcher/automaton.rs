//! Incremental delimiter matcher.
//!
//! [`DelimiterMatcher`] consumes a byte stream one byte at a time and reports
//! every position where a delimiter occurrence ends. Its state is a single
//! partial-match counter, so feeding the same bytes in different chunk sizes
//! always yields the same matches.
//!
//! # Reset after match
//!
//! After a match the counter is set to zero unconditionally, even when the
//! tail of the occurrence is a prefix of the delimiter. Matches are therefore
//! leftmost and non-overlapping: `"::"` over `":::::"` matches at 0..2 and
//! 2..4, never at 1..3.

use super::Delimiter;

/// Byte-at-a-time delimiter matching state.
///
/// # Example
///
/// ```
/// use splitrs::{Delimiter, DelimiterMatcher};
///
/// let delimiter = Delimiter::try_from("abac")?;
/// let mut matcher = DelimiterMatcher::new(delimiter);
///
/// let ends: Vec<usize> = b"ababacabacab"
///     .iter()
///     .enumerate()
///     .filter_map(|(i, &b)| matcher.update(b).then_some(i + 1))
///     .collect();
///
/// assert_eq!(ends, vec![6, 10]);
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DelimiterMatcher {
    delimiter: Delimiter,

    /// Number of leading delimiter bytes matched so far, in `0..len`.
    state: usize,
}

impl DelimiterMatcher {
    /// Creates a matcher with no partial match in progress.
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            state: 0,
        }
    }

    /// Creates a matcher positioned at a known phase.
    ///
    /// A phase equal to the delimiter length (match just ended) starts from
    /// zero.
    pub(crate) fn with_phase(delimiter: Delimiter, phase: usize) -> Self {
        let state = if phase == delimiter.len() { 0 } else { phase };
        Self { delimiter, state }
    }

    /// Pure transition: returns the next state and whether a match completed.
    ///
    /// `state` must be in `0..delimiter.len()`.
    pub fn step(&self, state: usize, byte: u8) -> (usize, bool) {
        debug_assert!(state < self.delimiter.len());
        let next = self.delimiter.advance(state, byte);
        if next == self.delimiter.len() {
            (0, true)
        } else {
            (next, false)
        }
    }

    /// Processes a single byte and returns true if a delimiter ended on it.
    #[inline]
    pub fn update(&mut self, byte: u8) -> bool {
        let (state, matched) = self.step(self.state, byte);
        self.state = state;
        matched
    }

    /// Feeds `data` until a delimiter completes.
    ///
    /// Returns the index just past the match (the record boundary, relative to
    /// `data`), or `None` once every byte has been consumed without a match.
    /// Calling again with the remaining bytes continues where this call
    /// stopped.
    pub fn find_match(&mut self, data: &[u8]) -> Option<usize> {
        let first = self.delimiter.first_byte();
        let mut i = 0;

        while i < data.len() {
            // Without a partial match only the first delimiter byte can move
            // the state.
            if self.state == 0 {
                match memchr::memchr(first, &data[i..]) {
                    Some(skip) => i += skip,
                    None => return None,
                }
            }

            let byte = data[i];
            i += 1;
            if self.update(byte) {
                return Some(i);
            }
        }

        None
    }

    /// Returns the number of delimiter bytes matched so far.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Drops any partial match.
    pub fn reset(&mut self) {
        self.state = 0;
    }

    /// Returns the delimiter being matched.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(delimiter: &str) -> DelimiterMatcher {
        DelimiterMatcher::new(Delimiter::try_from(delimiter).unwrap())
    }

    fn ends_bytewise(delimiter: &str, input: &[u8]) -> Vec<usize> {
        let mut m = matcher(delimiter);
        input
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| m.update(b).then_some(i + 1))
            .collect()
    }

    fn ends_chunked(delimiter: &str, input: &[u8], chunk: usize) -> Vec<usize> {
        let mut m = matcher(delimiter);
        let mut ends = Vec::new();
        let mut base = 0;
        for piece in input.chunks(chunk) {
            let mut i = 0;
            while let Some(n) = m.find_match(&piece[i..]) {
                i += n;
                ends.push(base + i);
            }
            base += piece.len();
        }
        ends
    }

    #[test]
    fn test_non_overlapping_matches() {
        assert_eq!(ends_bytewise("abac", b"ababacabacab"), vec![6, 10]);
    }

    #[test]
    fn test_reset_after_match() {
        // 5 colons: matches at 0..2 and 2..4, the last colon is left over.
        assert_eq!(ends_bytewise("::", b":::::"), vec![2, 4]);
        assert_eq!(ends_bytewise("aa", b"aaaaaa"), vec![2, 4, 6]);
    }

    #[test]
    fn test_restart_on_mismatch() {
        // "aab" inside "aaab": the mismatch at the third 'a' keeps "aa".
        assert_eq!(ends_bytewise("aab", b"aaab"), vec![4]);
    }

    #[test]
    fn test_delimiter_longer_than_input() {
        assert!(ends_bytewise("...:|", b"..:|").is_empty());
    }

    #[test]
    fn test_chunk_size_independence() {
        let input = b"aaa::|bbb::|::|c:|:::|::|:";
        let expected = ends_bytewise("::|", input);
        assert_eq!(expected, vec![6, 12, 15, 22, 25]);

        for chunk in 1..=input.len() {
            assert_eq!(
                ends_chunked("::|", input, chunk),
                expected,
                "chunk size {} changed the matches",
                chunk
            );
        }
    }

    #[test]
    fn test_find_match_resumes_partial() {
        let mut m = matcher("...:|");
        assert_eq!(m.find_match(b"xx..."), None);
        assert_eq!(m.state(), 3);
        assert_eq!(m.find_match(b":|yy"), Some(2));
        assert_eq!(m.state(), 0);
    }

    #[test]
    fn test_step_is_pure() {
        let m = matcher("ab");
        assert_eq!(m.step(0, b'a'), (1, false));
        assert_eq!(m.step(1, b'b'), (0, true));
        assert_eq!(m.step(1, b'a'), (1, false));
        assert_eq!(m.state(), 0);
    }

    #[test]
    fn test_with_phase_after_match() {
        let delimiter = Delimiter::try_from("::").unwrap();
        let m = DelimiterMatcher::with_phase(delimiter.clone(), 2);
        assert_eq!(m.state(), 0);
        let m = DelimiterMatcher::with_phase(delimiter, 1);
        assert_eq!(m.state(), 1);
    }

    #[test]
    fn test_reset() {
        let mut m = matcher("abc");
        m.update(b'a');
        m.update(b'b');
        assert_eq!(m.state(), 2);
        m.reset();
        assert_eq!(m.state(), 0);
    }
}
