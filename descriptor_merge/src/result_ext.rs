//! Extensions for mapping errors to `MergeResult` concisely.
//!
//! - Use [`MergeResultExt::into_merge`] for error types that implement
//!   `Into<MergeError>`, such as `figment::Error` and `serde_json::Error`.
//! - Use [`CollaboratorExt::collaborator`] for failures reported by a
//!   [`crate::Discovery`] implementation.
//!
//! # Examples
//!
//! ```
//! use descriptor_merge::{MergeResult, MergeResultExt};
//!
//! fn serialize() -> MergeResult<serde_json::Value> {
//!     serde_json::to_value(42).into_merge()
//! }
//! # assert!(serialize().is_ok());
//! ```

use std::sync::Arc;

use crate::{MergeError, MergeResult, discovery::DiscoveryError};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<MergeError>`
/// into a `MergeResult<T>`.
pub trait MergeResultExt<T, E> {
    /// Convert `Result<T, E>` into `MergeResult<T>` using `Into<MergeError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<MergeError>`.
    fn into_merge(self) -> MergeResult<T>;
}

impl<T, E> MergeResultExt<T, E> for Result<T, E>
where
    E: Into<MergeError>,
{
    fn into_merge(self) -> MergeResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Extension tailored to mapping discovery failures.
pub trait CollaboratorExt<T> {
    /// Convert a discovery result into `MergeResult<T>`, naming the query
    /// that was in flight.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Collaborator`] when the input is `Err`.
    fn collaborator(self, operation: impl FnOnce() -> String) -> MergeResult<T>;
}

impl<T> CollaboratorExt<T> for Result<T, DiscoveryError> {
    fn collaborator(self, operation: impl FnOnce() -> String) -> MergeResult<T> {
        self.map_err(|source| {
            Arc::new(MergeError::Collaborator {
                operation: operation(),
                source,
            })
        })
    }
}
