//! Segment transition summaries.
//!
//! A range scan needs the matcher phase at its first byte. For self-overlapping
//! delimiters that phase depends on the entire prefix, so parallel splits
//! summarize each segment as a map from entry phase to exit phase, computed
//! independently, then compose the maps in offset order.
//!
//! The summary is built by running one matcher head per possible entry phase
//! in lockstep and merging heads that land on the same phase. On most inputs
//! every head converges within a few delimiter lengths and the rest of the
//! segment is processed with a single head.

use super::Delimiter;

/// Bytes processed between head merges.
const MERGE_INTERVAL: usize = 64;

/// Runs every entry phase of a delimiter over a byte segment.
#[derive(Debug, Clone)]
pub(crate) struct Multistate {
    delimiter: Delimiter,

    /// Entry phase -> index into `heads`.
    owner: Vec<usize>,

    /// Current phase of each distinct head.
    heads: Vec<usize>,
}

impl Multistate {
    pub(crate) fn new(delimiter: &Delimiter) -> Self {
        let phases = delimiter.len() + 1;
        Self {
            delimiter: delimiter.clone(),
            owner: (0..phases).collect(),
            heads: (0..phases).collect(),
        }
    }

    /// Advances every head over `data`.
    pub(crate) fn feed(&mut self, data: &[u8]) {
        let mut rest = data;
        while !rest.is_empty() {
            if self.heads.len() == 1 {
                let mut phase = self.heads[0];
                for &byte in rest {
                    phase = self.delimiter.advance(phase, byte);
                }
                self.heads[0] = phase;
                return;
            }

            let (block, tail) = rest.split_at(rest.len().min(MERGE_INTERVAL));
            for &byte in block {
                for head in self.heads.iter_mut() {
                    *head = self.delimiter.advance(*head, byte);
                }
            }
            self.merge();
            rest = tail;
        }
    }

    /// Number of distinct phases still being tracked.
    pub(crate) fn live_heads(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn finish(self) -> TransitionSummary {
        TransitionSummary {
            exits: self.owner.iter().map(|&head| self.heads[head]).collect(),
        }
    }

    fn merge(&mut self) {
        let mut merged: Vec<usize> = Vec::with_capacity(self.heads.len());
        let mut remap = Vec::with_capacity(self.heads.len());
        for &phase in &self.heads {
            match merged.iter().position(|&m| m == phase) {
                Some(existing) => remap.push(existing),
                None => {
                    remap.push(merged.len());
                    merged.push(phase);
                }
            }
        }
        for owner in self.owner.iter_mut() {
            *owner = remap[*owner];
        }
        self.heads = merged;
    }
}

/// Entry phase -> exit phase map of one byte segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransitionSummary {
    exits: Vec<usize>,
}

impl TransitionSummary {
    /// Phase after the segment, given the phase before it.
    pub(crate) fn apply(&self, phase: usize) -> usize {
        self.exits[phase]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_phase(delimiter: &Delimiter, start: usize, data: &[u8]) -> usize {
        data.iter()
            .fold(start, |phase, &byte| delimiter.advance(phase, byte))
    }

    #[test]
    fn test_empty_segment_is_identity() {
        let delimiter = Delimiter::try_from("::").unwrap();
        let summary = Multistate::new(&delimiter).finish();
        for phase in 0..=2 {
            assert_eq!(summary.apply(phase), phase);
        }
    }

    #[test]
    fn test_summary_matches_sequential_run() {
        let delimiter = Delimiter::try_from("abab").unwrap();
        let data = b"babababxabababab".repeat(20);

        let mut multistate = Multistate::new(&delimiter);
        for piece in data.chunks(7) {
            multistate.feed(piece);
        }
        let summary = multistate.finish();

        for phase in 0..=delimiter.len() {
            assert_eq!(
                summary.apply(phase),
                sequential_phase(&delimiter, phase, &data),
                "entry phase {}",
                phase
            );
        }
    }

    #[test]
    fn test_periodic_input_keeps_two_heads() {
        // Parity of a run of colons decides where "::" matches.
        let delimiter = Delimiter::try_from("::").unwrap();
        let mut multistate = Multistate::new(&delimiter);
        multistate.feed(&[b':'; 1000]);
        assert_eq!(multistate.live_heads(), 2);

        let summary = multistate.finish();
        assert_eq!(summary.apply(0), 2);
        assert_eq!(summary.apply(1), 1);
        assert_eq!(summary.apply(2), 2);
    }

    #[test]
    fn test_heads_converge_on_mismatch() {
        let delimiter = Delimiter::try_from("::").unwrap();
        let mut multistate = Multistate::new(&delimiter);
        multistate.feed(b"::x");
        assert_eq!(multistate.live_heads(), 1);
        assert_eq!(multistate.finish().apply(1), 0);
    }

    #[test]
    fn test_composition_equals_whole() {
        let delimiter = Delimiter::try_from("aa").unwrap();
        let data = b"aaabaaaaabaaa";

        let (left, right) = data.split_at(5);
        let mut a = Multistate::new(&delimiter);
        a.feed(left);
        let mut b = Multistate::new(&delimiter);
        b.feed(right);
        let (a, b) = (a.finish(), b.finish());

        assert_eq!(
            b.apply(a.apply(0)),
            sequential_phase(&delimiter, 0, data)
        );
    }
}
