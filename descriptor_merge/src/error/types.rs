//! Primary error enum for descriptor merge flows.

use figment::Error as FigmentError;
use thiserror::Error;

use super::{aggregate::AggregatedErrors, conflict::Conflict};
use crate::discovery::DiscoveryError;

/// Errors that can occur while merging a module's descriptors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// Two fragments supplied different values for the same field.
    #[error("{0}")]
    Conflict(Box<Conflict>),

    /// A discovered or declared component failed a structural check.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Class, component, or URL pattern that failed validation.
        key: String,
        /// Human-readable explanation of the validation failure.
        message: String,
    },

    /// The class discovery collaborator could not answer a query.
    #[error("Class discovery failed while {operation}: {source}")]
    Collaborator {
        /// Query that was in flight when discovery failed.
        operation: String,
        /// Underlying error reported by the collaborator.
        #[source]
        source: DiscoveryError,
    },

    /// Merge options could not be gathered from their providers.
    #[error("Failed to load merge options: {0}")]
    Options(#[from] Box<FigmentError>),

    /// The merged module could not be serialized.
    #[error("Failed to serialize merged module: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A context key was used with a different shape or value type than the
    /// one it was first populated with.
    #[error("context key '{key}' holds {found}, not {expected}")]
    ContextShape {
        /// Key that was misused.
        key: String,
        /// Shape requested by the caller.
        expected: String,
        /// Shape already stored under the key.
        found: String,
    },

    /// A phase operation was invoked out of order.
    #[error("cannot {operation} while the session is in the {phase} phase")]
    PhaseOrder {
        /// Operation that was rejected.
        operation: &'static str,
        /// Phase the session was in when the call arrived.
        phase: String,
    },

    /// An internal precondition of the merge engine was violated.
    #[error("merge invariant violated: {0}")]
    Invariant(String),

    /// Multiple errors were accumulated during a single merge.
    #[error("multiple descriptor merge errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
