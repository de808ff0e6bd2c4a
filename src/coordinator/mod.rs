//! Multi-range split orchestration.
//!
//! - [`SplitCoordinator`] - Splits a source over one or many byte ranges
//! - [`CancelToken`] - Cooperative cancellation shared across range scans
//! - [`split`] - One-shot split with default configuration

mod cancel;
mod split;

pub use cancel::CancelToken;
pub use split::{split, SplitCoordinator};
