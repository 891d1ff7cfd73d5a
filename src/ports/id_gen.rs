//! ID generator port for producing document identifiers.

/// Generates unique identifiers for library documents.
///
/// Abstracting ID generation allows deterministic tests to substitute a
/// predictable sequence.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
