//! Soft-assertion collection for quest executions.
//!
//! Soft assertions record failures without aborting the current step; the
//! accumulated failures are surfaced once, in aggregate, when the quest
//! completes.

mod soft;

pub use soft::{SoftAssertions, SoftFailure};
