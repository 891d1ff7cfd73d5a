//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Abstracting time access keeps the suggestion debouncer a pure state
/// machine: tests drive it with fixed timestamps instead of sleeping.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
