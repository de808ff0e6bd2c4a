//! Internal read buffer management.
//!
//! Blocking readers fill a scratch buffer taken from a thread-local pool, so
//! short-lived iterators do not allocate a fresh read buffer each time.

mod pool;

pub(crate) use pool::Buffer;
