//! The soft-assertion collector.

use crate::errors::SoftAssertionError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recorded soft-assertion failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftFailure {
    /// Human-readable description of the check.
    pub description: String,
    /// The expected value, rendered for reporting.
    pub expected: String,
    /// The actual value, rendered for reporting.
    pub actual: String,
}

impl SoftFailure {
    /// Creates a new failure record.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Collector of non-fatal checks.
///
/// Recording a failure never raises; the accumulated failures are evaluated
/// by [`SoftAssertions::assert_all`], typically via `Quest::complete`.
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: RwLock<Vec<SoftFailure>>,
}

impl SoftAssertions {
    /// Creates a new empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure when the condition does not hold.
    pub fn assert_that(&self, description: impl Into<String>, condition: bool) {
        if !condition {
            self.fail(description, "true", "false");
        }
    }

    /// Records a failure when the two values differ.
    pub fn assert_eq<T: PartialEq + fmt::Debug>(
        &self,
        description: impl Into<String>,
        expected: &T,
        actual: &T,
    ) {
        if expected != actual {
            self.fail(description, format!("{expected:?}"), format!("{actual:?}"));
        }
    }

    /// Records a failure unconditionally.
    pub fn fail(
        &self,
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) {
        let failure = SoftFailure::new(description, expected, actual);
        tracing::debug!(
            description = %failure.description,
            expected = %failure.expected,
            actual = %failure.actual,
            "soft assertion failed"
        );
        self.failures.write().push(failure);
    }

    /// Returns a copy of the recorded failures, in recording order.
    #[must_use]
    pub fn failures(&self) -> Vec<SoftFailure> {
        self.failures.read().clone()
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.read().len()
    }

    /// Returns true if no failures have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.read().is_empty()
    }

    /// Returns true if at least one failure has been recorded.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.is_empty()
    }

    /// Evaluates the accumulated checks.
    ///
    /// # Errors
    ///
    /// Returns a [`SoftAssertionError`] aggregating every recorded failure.
    pub fn assert_all(&self) -> Result<(), SoftAssertionError> {
        let failures = self.failures.read().clone();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SoftAssertionError::new(failures))
        }
    }

    /// Returns a JSON report of the recorded failures.
    #[must_use]
    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "failed": self.len(),
            "failures": self.failures(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_never_raises() {
        let soft = SoftAssertions::new();
        soft.fail("Name mismatch", "Bob", "Alice");
        soft.assert_that("logged in", false);
        soft.assert_eq("status", &200, &500);

        assert_eq!(soft.len(), 3);
        assert!(soft.has_failures());
    }

    #[test]
    fn test_passing_checks_record_nothing() {
        let soft = SoftAssertions::new();
        soft.assert_that("logged in", true);
        soft.assert_eq("status", &200, &200);

        assert!(soft.is_empty());
        assert!(soft.assert_all().is_ok());
    }

    #[test]
    fn test_assert_all_aggregates_in_order() {
        let soft = SoftAssertions::new();
        soft.fail("first", "a", "b");
        soft.fail("second", "c", "d");

        let err = soft.assert_all().unwrap_err();
        assert_eq!(err.count(), 2);
        assert_eq!(err.failures[0].description, "first");
        assert_eq!(err.failures[1].description, "second");
    }

    #[test]
    fn test_report_shape() {
        let soft = SoftAssertions::new();
        soft.fail("Name mismatch", "Bob", "Alice");

        let report = soft.report();
        assert_eq!(report["failed"], 1);
        assert_eq!(report["failures"][0]["expected"], "Bob");
    }
}
