//! Thread-local pool of scratch read buffers.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read};

/// Largest buffer returned to the pool (1 MiB).
pub const MAX_POOLED_SIZE: usize = 1024 * 1024;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A reusable scratch buffer for blocking reads.
pub(crate) struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer of `size` bytes from the thread-local pool or creates one.
    pub(crate) fn take(size: usize) -> Self {
        let size = size.max(1);
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();
        data.resize(size, 0);
        Self { data }
    }

    /// Fills the buffer with one read, retrying on `Interrupted`.
    ///
    /// Returns the bytes read; an empty slice means end of stream.
    pub(crate) fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<&[u8]> {
        loop {
            match reader.read(&mut self.data) {
                Ok(n) => return Ok(&self.data[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns the buffer size.
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if self.data.capacity() <= MAX_POOLED_SIZE {
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_buffer_take() {
        let buf = Buffer::take(4096);
        assert_eq!(buf.capacity(), 4096);
        assert_eq!(Buffer::take(0).capacity(), 1);
    }

    #[test]
    fn test_read_from() {
        let mut buf = Buffer::take(4);
        let mut reader = Cursor::new(b"hello".to_vec());
        assert_eq!(buf.read_from(&mut reader).unwrap(), b"hell");
        assert_eq!(buf.read_from(&mut reader).unwrap(), b"o");
        assert!(buf.read_from(&mut reader).unwrap().is_empty());
    }

    #[test]
    fn test_buffer_reuse_resizes() {
        {
            let _big = Buffer::take(8192);
        }

        // The pooled buffer is handed back at the requested size.
        let buf = Buffer::take(16);
        assert_eq!(buf.capacity(), 16);
    }
}
