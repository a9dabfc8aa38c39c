//! Trait-based conversions between external error types and `MergeError`.

use figment::Error as FigmentError;

use super::MergeError;

impl From<FigmentError> for MergeError {
    fn from(e: FigmentError) -> Self {
        Self::options(e)
    }
}

impl From<MergeError> for FigmentError {
    /// Allow using `?` in tests that return `figment::Error`.
    fn from(e: MergeError) -> Self {
        match e {
            MergeError::Options(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
