#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use splitrs::{Delimiter, MemorySource, SplitConfig, SplitCoordinator, Splitter};

fuzz_target!(|data: &[u8]| {
    // Layout: [delimiter length][push size][delimiter][input]
    if data.len() < 3 {
        return;
    }
    let delimiter_len = 1 + (data[0] % 4) as usize;
    let piece = 1 + (data[1] % 16) as usize;
    let rest = &data[2..];
    if rest.len() < delimiter_len {
        return;
    }
    let (delimiter, input) = rest.split_at(delimiter_len);

    let mut splitter = Splitter::new(Delimiter::try_from(delimiter).unwrap());
    let mut records = Vec::new();
    for part in input.chunks(piece) {
        records.extend(splitter.push(Bytes::copy_from_slice(part)));
    }
    records.extend(splitter.finish());

    // Verify: data matches offsets and concatenates to the input
    let mut joined = Vec::with_capacity(input.len());
    for record in &records {
        assert_eq!(record.offset, joined.len() as u64);
        joined.extend_from_slice(&record.data);
    }
    assert_eq!(joined, input);

    // Verify: streaming and range splitting agree
    let source = MemorySource::new(input.to_vec());
    let coordinator = SplitCoordinator::new(delimiter, SplitConfig::default()).unwrap();
    let spans: Vec<_> = records.iter().map(|r| r.span()).collect();
    assert_eq!(coordinator.split(&source, None).unwrap(), spans);
});
