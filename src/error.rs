use thiserror::Error;

/// Errors raised by the matching engine
///
/// Record-level variants are normally folded into a batch result as
/// rejected records instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("student at position {index} has no identifier")]
    MissingStudentId { index: usize },

    #[error("internship at position {index} has no identifier")]
    MissingInternshipId { index: usize },

    #[error("student at position {index} is missing required field `{field}`")]
    IncompleteStudent { index: usize, field: &'static str },

    #[error("internship at position {index} is missing required field `{field}`")]
    IncompleteInternship { index: usize, field: &'static str },

    #[error("duplicate student identifier: {0}")]
    DuplicateStudentId(String),

    #[error("duplicate internship identifier: {0}")]
    DuplicateInternshipId(String),

    #[error("scoring weights must be non-negative and sum to 1.0 (got {sum:.4})")]
    InvalidWeights { sum: f64 },
}
