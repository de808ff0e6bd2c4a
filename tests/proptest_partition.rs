// Property tests: any consecutive partition reproduces the whole-input split

use proptest::prelude::*;
use splitrs::{
    ByteRange, Delimiter, MemorySource, RecordSpan, SplitConfig, SplitCoordinator, Splitter,
};

fn naive_split(input: &[u8], delimiter: &[u8]) -> Vec<(u64, u64)> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut starts = vec![0u64];
    let mut i = 0;
    while i + delimiter.len() <= input.len() {
        if &input[i..i + delimiter.len()] == delimiter {
            i += delimiter.len();
            starts.push(i as u64);
        } else {
            i += 1;
        }
    }

    let mut records: Vec<(u64, u64)> = starts.windows(2).map(|w| (w[0], w[1])).collect();
    records.push((*starts.last().unwrap(), input.len() as u64));
    records
}

fn pairs(records: &[RecordSpan]) -> Vec<(u64, u64)> {
    records.iter().map(|r| (r.start(), r.end())).collect()
}

/// Turns sorted cut points into consecutive ranges covering `[0, len)`.
fn ranges_from_cuts(len: u64, cuts: &[u64]) -> Vec<ByteRange> {
    let mut bounds: Vec<u64> = cuts.iter().map(|c| c % (len + 1)).collect();
    bounds.sort_unstable();
    bounds.insert(0, 0);
    bounds.push(len);
    bounds
        .windows(2)
        .map(|w| ByteRange::new(w[0], w[1] - w[0]))
        .collect()
}

// Small alphabets make delimiter occurrences and near-misses common.
fn input_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b':', b'|']), 0..200)
}

fn delimiter_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b':', b'|']), 1..5)
}

proptest! {
    #[test]
    fn partition_matches_whole_input(
        input in input_strategy(),
        delimiter in delimiter_strategy(),
        cuts in prop::collection::vec(any::<u64>(), 0..8),
        chunk_size in 1usize..17,
    ) {
        let source = MemorySource::new(input.clone());
        let config = SplitConfig::default().with_chunk_size(chunk_size);
        let coordinator = SplitCoordinator::new(&delimiter, config).unwrap();
        let ranges = ranges_from_cuts(input.len() as u64, &cuts);
        let expected = naive_split(&input, &delimiter);

        let whole = coordinator.split(&source, None).unwrap();
        prop_assert_eq!(pairs(&whole), expected.clone());

        let sequential = coordinator.split_ranges(&source, &ranges).unwrap();
        prop_assert_eq!(pairs(&sequential), expected.clone());

        #[cfg(feature = "parallel")]
        {
            let parallel = coordinator.split_parallel(&source, &ranges).unwrap();
            prop_assert_eq!(pairs(&parallel), expected.clone());
        }

        let mut standalone = Vec::new();
        for range in &ranges {
            standalone.extend(coordinator.split(&source, Some(*range)).unwrap());
        }
        prop_assert_eq!(pairs(&standalone), expected);
    }

    #[test]
    fn streaming_matches_whole_input(
        input in input_strategy(),
        delimiter in delimiter_strategy(),
        piece in 1usize..13,
    ) {
        let mut splitter = Splitter::new(Delimiter::try_from(&delimiter[..]).unwrap());
        let mut records = Vec::new();
        for part in input.chunks(piece) {
            records.extend(splitter.push(bytes::Bytes::copy_from_slice(part)));
        }
        records.extend(splitter.finish());

        let streamed: Vec<(u64, u64)> = records.iter().map(|r| (r.start(), r.end())).collect();
        prop_assert_eq!(streamed, naive_split(&input, &delimiter));
    }
}
