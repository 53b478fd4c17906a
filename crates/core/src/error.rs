use thiserror::Error;

/// Failures surfaced by the PRT core. All of them are local and deterministic:
/// retrying with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrtError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Absent index in a transfer mapping; the index-space flavour of a dimension mismatch.
    #[error("transfer entry {index} is absent ({len} entries)")]
    MissingEntry { index: usize, len: usize },

    #[error("numerical error: {0}")]
    Numerical(String),
}

impl PrtError {
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(
            self,
            PrtError::DimensionMismatch { .. } | PrtError::MissingEntry { .. }
        )
    }
}
