//! Range scanning.
//!
//! - [`RangeScanner`] - Splits one byte range, reading past its end as needed
//! - [`RangeScan`] - The record edges a range owns
//!
//! # Ownership
//!
//! Record starts are offset 0 and every delimiter match end. A non-empty range
//! `[offset, end)` owns the records whose start lies inside it; the range that
//! reaches the end of the input also owns a start at the input length (the
//! empty record after a trailing delimiter). Every start is owned by exactly
//! one range of a consecutive partition, which is why per-range results
//! concatenate into the whole-input result.

mod scanner;
mod sync;

pub use scanner::{RangeScan, RangeScanner};
pub(crate) use sync::{entry_phase, phases_at};
#[cfg(feature = "parallel")]
pub(crate) use sync::summarize;
