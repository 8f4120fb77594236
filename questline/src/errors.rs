//! Error types for the questline context layer.
//!
//! The taxonomy distinguishes structural misuse (always a hard error), type
//! mismatches at the retrieval boundary (resolved to absence, except through
//! an extractor), deferred-value failures, and aggregated soft-assertion
//! failures surfaced at quest completion.

use crate::assertions::SoftFailure;
use crate::storage::DataKey;
use std::fmt;
use thiserror::Error;

/// The main error type for quest operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuestError {
    /// No world of the requested type is registered in the quest.
    #[error("No world of type '{world}' is registered in this quest")]
    WorldNotRegistered {
        /// The requested world type.
        world: String,
    },

    /// The world exposes no artifact assignable to the requested type.
    #[error("World '{world}' exposes no artifact assignable to '{artifact}'")]
    ArtifactNotFound {
        /// The world that was searched.
        world: String,
        /// The requested artifact type.
        artifact: String,
    },

    /// A world handle was used before it was attached to a quest, or after
    /// its quest was dropped.
    #[error("World is not attached to a live quest")]
    WorldDetached,

    /// The quest was used after `complete()`.
    #[error("Quest has already been completed")]
    AlreadyCompleted,

    /// A storage error occurred.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// One or more soft assertions failed at completion.
    #[error("{0}")]
    SoftAssertion(#[from] SoftAssertionError),
}

/// Errors raised by the hierarchical storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A sub-storage was requested under a key already holding plain values.
    #[error("Key '{key}' already holds a plain value and cannot be opened as a sub-storage")]
    SubStorageConflict {
        /// The conflicting key.
        key: DataKey,
    },

    /// The default sub-storage was requested before any lookup matched the
    /// configured name.
    #[error("No default sub-storage has been resolved for this process")]
    NoDefaultSubStorage,

    /// An extractor found no raw value to project from.
    #[error("No value stored under key '{key}' to extract from")]
    ExtractionMissing {
        /// The extractor's key.
        key: DataKey,
    },

    /// An extractor's projection did not produce the requested type.
    #[error("Value under key '{key}' did not project to '{expected}'")]
    ExtractionMismatch {
        /// The extractor's key.
        key: DataKey,
        /// The requested type.
        expected: &'static str,
    },
}

/// Errors surfaced when joining a deferred value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LateError {
    /// The underlying producer reported a failure.
    #[error("Late value failed: {0}")]
    Failed(String),

    /// The producer was dropped without resolving the value.
    #[error("Late value was abandoned before resolution")]
    Abandoned,
}

/// Aggregate error listing every failed soft assertion of a quest.
///
/// Raised once, at completion, rather than at the point each check was
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftAssertionError {
    /// The recorded failures, in recording order.
    pub failures: Vec<SoftFailure>,
}

impl SoftAssertionError {
    /// Creates a new aggregate from the recorded failures.
    #[must_use]
    pub fn new(failures: Vec<SoftFailure>) -> Self {
        Self { failures }
    }

    /// Returns the number of failed assertions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.failures.len()
    }
}

impl fmt::Display for SoftAssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} soft assertion(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(
                f,
                "\n  - {}: expected '{}', got '{}'",
                failure.description, failure.expected, failure.actual
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for SoftAssertionError {}
