//! Benchmarks for splitrs.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use splitrs::{
    partition_consecutive, Delimiter, MemorySource, SplitConfig, SplitCoordinator, Splitter,
};

/// Newline-free records of varying length separated by `delimiter`.
fn records_input(size: usize, delimiter: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(size + 64);
    let mut i = 0usize;
    while data.len() < size {
        let len = 20 + (i * 37) % 180;
        data.extend((0..len).map(|j| b'a' + ((i + j) % 26) as u8));
        data.extend_from_slice(delimiter);
        i += 1;
    }
    data.truncate(size);
    data
}

fn bench_whole(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        for delimiter in [&b"\n"[..], &b"\r\n"[..], &b"...:|"[..]] {
            let source = MemorySource::new(records_input(size, delimiter));
            let coordinator = SplitCoordinator::new(delimiter, SplitConfig::default()).unwrap();

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_function(
                format!("{}kb_{}b_delim", size / 1024, delimiter.len()),
                |b| {
                    b.iter(|| {
                        let records = coordinator.split(black_box(&source), None).unwrap();
                        black_box(records.len())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranges");
    let size = 10 * 1024 * 1024;

    // Borderless and self-overlapping delimiters take different sync paths.
    for (name, delimiter) in [("crlf", &b"\r\n"[..]), ("colons", &b"::"[..])] {
        let source = MemorySource::new(records_input(size, delimiter));
        let coordinator = SplitCoordinator::new(delimiter, SplitConfig::default()).unwrap();

        for n in [1, 4, 16] {
            let ranges = partition_consecutive(size as u64, n).unwrap();
            group.throughput(Throughput::Bytes(size as u64));

            group.bench_function(format!("sequential_{}_{}", name, n), |b| {
                b.iter(|| {
                    let records = coordinator.split_ranges(&source, black_box(&ranges)).unwrap();
                    black_box(records.len())
                });
            });

            #[cfg(feature = "parallel")]
            group.bench_function(format!("parallel_{}_{}", name, n), |b| {
                b.iter(|| {
                    let records = coordinator.split_parallel(&source, black_box(&ranges)).unwrap();
                    black_box(records.len())
                });
            });
        }
    }

    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    let size = 1024 * 1024;
    let data = records_input(size, b"\n");

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("push", |b| {
        b.iter(|| {
            let mut splitter = Splitter::new(Delimiter::try_from("\n").unwrap());
            let records = splitter.split_bytes(black_box(data.clone()));
            black_box(records.len())
        });
    });

    group.bench_function("iterator", |b| {
        b.iter(|| {
            let cursor = std::io::Cursor::new(black_box(&data));
            let splitter = Splitter::new(Delimiter::try_from("\n").unwrap());
            let mut count = 0;
            for record in splitter.split_reader(cursor) {
                let _ = record.unwrap();
                count += 1;
            }
            black_box(count)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_whole, bench_ranges, bench_streaming);
criterion_main!(benches);
