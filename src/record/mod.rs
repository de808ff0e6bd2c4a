//! Record types.
//!
//! - [`RecordSpan`] - Half-open byte span produced by range splitting
//! - [`Record`] - Record bytes with their input offset, produced by streaming

mod data;
mod span;

pub use data::Record;
pub use span::RecordSpan;
