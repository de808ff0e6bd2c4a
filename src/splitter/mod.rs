//! Streaming splitting for inputs without a known length.
//!
//! - [`Splitter`] - Stateful engine with `push()`/`finish()` API
//! - [`RecordIter`] - Iterator of records over a [`std::io::Read`]

mod engine;
mod iter;

pub use engine::Splitter;
pub use iter::RecordIter;
