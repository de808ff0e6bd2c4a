//! Literal delimiter matching.
//!
//! - [`Delimiter`] - Validated delimiter with precomputed transition tables
//! - [`DelimiterMatcher`] - Incremental reset-after-match automaton
//! - `Multistate` - Per-segment transition summaries for parallel scans

mod automaton;
mod delimiter;
#[cfg(feature = "parallel")]
mod multistate;

pub use automaton::DelimiterMatcher;
pub use delimiter::{Delimiter, DENSE_TABLE_MAX_LEN};
#[cfg(feature = "parallel")]
pub(crate) use multistate::{Multistate, TransitionSummary};
