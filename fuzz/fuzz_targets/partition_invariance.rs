#![no_main]

use libfuzzer_sys::fuzz_target;
use splitrs::{partition_consecutive, ByteRange, MemorySource, SplitConfig, SplitCoordinator};

fuzz_target!(|data: &[u8]| {
    // Layout: [delimiter length][range count][chunk size][delimiter][input]
    if data.len() < 4 {
        return;
    }
    let delimiter_len = 1 + (data[0] % 6) as usize;
    let ranges = 1 + (data[1] % 9) as usize;
    let chunk_size = 1 + (data[2] % 32) as usize;
    let rest = &data[3..];
    if rest.len() < delimiter_len {
        return;
    }
    let (delimiter, input) = rest.split_at(delimiter_len);

    let source = MemorySource::new(input.to_vec());
    let config = SplitConfig::default().with_chunk_size(chunk_size);
    let coordinator = SplitCoordinator::new(delimiter, config).unwrap();

    let whole = coordinator.split(&source, None).unwrap();

    // Verify: records tile the input
    let mut expected_start = 0u64;
    for record in &whole {
        assert_eq!(record.start(), expected_start);
        expected_start = record.end();
    }
    assert_eq!(expected_start, input.len() as u64);

    // Verify: every consecutive partition stitches back to the whole
    let partition = partition_consecutive(input.len() as u64, ranges).unwrap();
    assert_eq!(coordinator.split_ranges(&source, &partition).unwrap(), whole);
    assert_eq!(coordinator.split_parallel(&source, &partition).unwrap(), whole);

    let mut standalone = Vec::new();
    for range in &partition {
        standalone.extend(coordinator.split(&source, Some(*range)).unwrap());
    }
    assert_eq!(standalone, whole);

    // Verify: a range past the end owns nothing
    let beyond = ByteRange::new(input.len() as u64 + 1, 4);
    assert!(coordinator.split(&source, Some(beyond)).unwrap().is_empty());
});
