//! File-backed chunk source.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};

use super::{ChunkCursor, ChunkSource};
use crate::error::SplitError;

/// A source over a file on disk.
///
/// The length is captured when the source is opened. Each cursor opens its
/// own file handle, so parallel range scans never share a file position.
///
/// # Example
///
/// ```no_run
/// use splitrs::{FileSource, SplitCoordinator, SplitConfig};
///
/// let source = FileSource::open("records.log")?;
/// let coordinator = SplitCoordinator::new(b"\n", SplitConfig::default())?;
/// let spans = coordinator.split(&source, None)?;
/// println!("{} records", spans.len());
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    len: u64,
}

impl FileSource {
    /// Opens `path` and records its current length.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SplitError> {
        let path = path.as_ref().to_path_buf();
        let len = std::fs::metadata(&path)?.len();
        Ok(Self { path, len })
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkSource for FileSource {
    type Cursor = FileCursor;

    fn len(&self) -> u64 {
        self.len
    }

    fn open_at(&self, offset: u64) -> Result<Self::Cursor, SplitError> {
        if offset > self.len {
            return Err(SplitError::OutOfBounds {
                offset,
                len: self.len,
            });
        }

        let read_err = |source| SplitError::SourceRead { offset, source };
        let mut file = File::open(&self.path).map_err(read_err)?;
        file.seek(SeekFrom::Start(offset)).map_err(read_err)?;

        Ok(FileCursor { file, pos: offset })
    }
}

/// Cursor over a [`FileSource`], owning its own handle.
#[derive(Debug)]
pub struct FileCursor {
    file: File,
    pos: u64,
}

impl ChunkCursor for FileCursor {
    fn read_chunk(&mut self, max_size: usize) -> Result<Option<Bytes>, SplitError> {
        if max_size == 0 {
            return Ok(None);
        }

        let mut buf = BytesMut::zeroed(max_size);
        let n = loop {
            match self.file.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(SplitError::SourceRead {
                        offset: self.pos,
                        source,
                    });
                }
            }
        };

        if n == 0 {
            return Ok(None);
        }

        buf.truncate(n);
        self.pos += n as u64;
        Ok(Some(buf.freeze()))
    }
}
