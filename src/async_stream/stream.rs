//! Async stream adapter for splitting.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use splitrs::{split_async, Delimiter, SplitConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> Result<(), splitrs::SplitError> {
//!     let delimiter = Delimiter::try_from("\n")?;
//!     let mut stream = Box::pin(split_async(reader, delimiter, SplitConfig::default()));
//!
//!     while let Some(record) = stream.next().await {
//!         let record = record?;
//!         println!("record: {} bytes", record.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::matcher::Delimiter;
use crate::record::Record;
use crate::splitter::Splitter;

pin_project! {
    /// A stream that yields records from an async reader.
    ///
    /// Yields exactly the records [`Splitter`] produces for the same bytes.
    /// An I/O error is yielded once and ends the stream.
    #[derive(Debug)]
    pub struct RecordStream<R> {
        #[pin]
        reader: R,
        splitter: Splitter,
        buffer: Vec<u8>,
        ready: VecDeque<Record>,
        finished: bool,
    }
}

impl<R> RecordStream<R> {
    /// Creates a record stream that reads `config.chunk_size()` bytes at a time.
    pub fn new(reader: R, delimiter: Delimiter, config: SplitConfig) -> Self {
        Self {
            reader,
            splitter: Splitter::with_config(delimiter, &config),
            buffer: vec![0u8; config.chunk_size().max(1)],
            ready: VecDeque::new(),
            finished: false,
        }
    }
}

impl<R: AsyncRead> Stream for RecordStream<R> {
    type Item = Result<Record, SplitError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(record) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(record)));
            }
            if *this.finished {
                return Poll::Ready(None);
            }

            match this.reader.as_mut().poll_read(cx, &mut this.buffer[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(SplitError::Io(e))));
                }
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    this.ready.extend(this.splitter.finish());
                }
                Poll::Ready(Ok(n)) => {
                    let data = Bytes::copy_from_slice(&this.buffer[..n]);
                    this.ready.extend(this.splitter.push(data));
                }
            }
        }
    }
}

/// Creates a record stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, `tokio_util::compat` converts `tokio::io::AsyncRead` to
/// `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use splitrs::{split_async, Delimiter, SplitConfig};
///
/// let file = tokio::fs::File::open("data.log").await?;
/// let stream = split_async(file.compat(), Delimiter::try_from("\n")?, SplitConfig::default());
/// ```
pub fn split_async<R: AsyncRead>(
    reader: R,
    delimiter: Delimiter,
    config: SplitConfig,
) -> RecordStream<R> {
    RecordStream::new(reader, delimiter, config)
}
