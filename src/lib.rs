//! splitrs
//!
//! Multi-byte delimiter record splitting with byte-range partitioning.
//!
//! `splitrs` splits a byte input into records terminated by a literal
//! delimiter of any length. The input can be cut into arbitrary byte ranges
//! that are scanned independently, for example by different threads or
//! machines, and the per-range results always concatenate into exactly the
//! records of a whole-input split.
//!
//! - A record ends just after a delimiter occurrence and keeps it
//! - Occurrences are matched leftmost and non-overlapping
//! - Records are never lost, duplicated or cut, whatever the range boundaries
//! - A range reads past its end when its last record continues there
//!
//! # Ranges
//!
//! ```
//! use splitrs::{partition_consecutive, ChunkSource, MemorySource, SplitConfig, SplitCoordinator};
//!
//! let source = MemorySource::new(&b"alpha::beta::gamma"[..]);
//! let coordinator = SplitCoordinator::new(b"::", SplitConfig::default())?;
//!
//! let ranges = partition_consecutive(source.len(), 4)?;
//! let records = coordinator.split_ranges(&source, &ranges)?;
//! assert_eq!(
//!     source.records(&records),
//!     vec![&b"alpha::"[..], &b"beta::"[..], &b"gamma"[..]]
//! );
//! # Ok::<(), splitrs::SplitError>(())
//! ```
//!
//! # Streams
//!
//! ```no_run
//! use std::fs::File;
//! use splitrs::{Delimiter, SplitError, Splitter};
//!
//! fn main() -> Result<(), SplitError> {
//!     let file = File::open("data.log")?;
//!     let splitter = Splitter::new(Delimiter::try_from("\n")?);
//!
//!     for record in splitter.split_reader(file) {
//!         let record = record?;
//!         println!("record {} bytes", record.data.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use splitrs::{split_async, Delimiter, SplitConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), splitrs::SplitError> {
//!     let mut stream = split_async(reader, Delimiter::try_from("\n")?, SplitConfig::default());
//!
//!     while let Some(record) = stream.next().await {
//!         let record = record?;
//!         println!("record {}", record.data.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coordinator;
mod error;
mod matcher;
mod range;
mod record;
mod scan;
mod source;
mod splitter;

mod buffer; // internal (thread-local reuse)

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use config::{SplitConfig, DEFAULT_CHUNK_SIZE};
pub use coordinator::{split, CancelToken, SplitCoordinator};
pub use error::SplitError;
pub use matcher::{Delimiter, DelimiterMatcher, DENSE_TABLE_MAX_LEN};
pub use range::{partition_consecutive, ByteRange};
pub use record::{Record, RecordSpan};
pub use scan::{RangeScan, RangeScanner};
pub use source::{ChunkCursor, ChunkSource, FileCursor, FileSource, MemoryCursor, MemorySource};
pub use splitter::{RecordIter, Splitter};

#[cfg(feature = "async-io")]
pub use async_stream::{split_async, RecordStream};
