//! Error taxonomy for generation and regeneration.

use thiserror::Error;

/// A categorized generation failure.
///
/// Producer-boundary failures are classified exactly once, at the
/// session/dispatcher boundary, into one user-facing category. None of
/// these are ever retried automatically, and cancellation is deliberately
/// not represented here — a cancelled session ends without error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The producer call failed. Events yielded before the failure remain
    /// applied.
    #[error("generation failed: {0}")]
    Producer(String),

    /// A recognized transient-capacity signal (rate limit / overload).
    /// Surfaced distinctly so the user is told a retry may succeed.
    #[error("the model is currently overloaded — try again shortly ({0})")]
    Overloaded(String),

    /// The producer returned syntactically invalid or wrong-shaped data.
    #[error("unexpected response, generation stopped ({0})")]
    Malformed(String),

    /// An index-bearing part address that no longer fits the addressed
    /// list. A usage error on the caller's side, reported rather than
    /// crashed on.
    #[error("stale part address: {field}[{index}] (list has {len} items)")]
    StaleAddress {
        /// The addressed list field's key.
        field: &'static str,
        /// The out-of-range index.
        index: usize,
        /// The list's current length.
        len: usize,
    },

    /// A file path that does not resolve to an existing environment file.
    #[error("no environment file at '{0}'")]
    UnknownPath(String),
}

impl GenerationError {
    /// Classifies a producer-boundary error by its message.
    ///
    /// The transient-capacity signal is embedded in the failure message by
    /// the adapter (HTTP 429/529, "overloaded" bodies); malformed
    /// structured data is marked the same way.
    #[must_use]
    pub fn from_boundary(err: &(dyn std::error::Error + Send + Sync)) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("overloaded") || lowered.contains("rate limit") {
            GenerationError::Overloaded(message)
        } else if lowered.contains("malformed") {
            GenerationError::Malformed(message)
        } else {
            GenerationError::Producer(message)
        }
    }

    /// A mismatch between the requested part and the produced variant.
    #[must_use]
    pub fn wrong_shape(expected: &str, got: &str) -> Self {
        GenerationError::Malformed(format!("expected {expected}, producer returned {got}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(msg: &str) -> Box<dyn std::error::Error + Send + Sync> {
        msg.to_string().into()
    }

    #[test]
    fn overload_signals_are_classified_distinctly() {
        let err = GenerationError::from_boundary(&*boundary("producer overloaded (529): busy"));
        assert!(matches!(err, GenerationError::Overloaded(_)));

        let err = GenerationError::from_boundary(&*boundary("Rate limit exceeded"));
        assert!(matches!(err, GenerationError::Overloaded(_)));
    }

    #[test]
    fn malformed_responses_are_classified_distinctly() {
        let err = GenerationError::from_boundary(&*boundary(
            "malformed producer response: expected value at line 1",
        ));
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn other_failures_fall_back_to_producer() {
        let err = GenerationError::from_boundary(&*boundary("connection reset by peer"));
        assert!(matches!(err, GenerationError::Producer(_)));
    }

    #[test]
    fn stale_address_reports_field_and_bounds() {
        let err = GenerationError::StaleAddress { field: "quiz", index: 4, len: 3 };
        assert_eq!(err.to_string(), "stale part address: quiz[4] (list has 3 items)");
    }
}
