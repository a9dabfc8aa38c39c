//! Constructors and aggregation helpers for `MergeError`.

use std::sync::Arc;

use figment::Error as FigmentError;

use super::{AggregatedErrors, Conflict, MergeError};

impl MergeError {
    /// Tries to build a [`MergeError`] from an iterator of errors.
    ///
    /// The iterator is consumed eagerly. It returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] containing that single [`Arc`] when the error is already shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Build a [`MergeError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`MergeError::try_aggregate`] when the
    /// list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }

    /// Construct an options error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use descriptor_merge::MergeError;
    /// let e = MergeError::options(figment::Error::from("boom"));
    /// assert!(matches!(e, MergeError::Options(_)));
    /// ```
    #[must_use]
    pub fn options(source: FigmentError) -> Self {
        Self::Options(Box::new(source))
    }

    /// Construct a conflict error.
    #[must_use]
    pub fn conflict(conflict: Conflict) -> Self {
        Self::Conflict(Box::new(conflict))
    }

    /// Construct a validation error for `key`.
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a phase-order error wrapped in an [`Arc`].
    #[must_use]
    pub fn phase_order_arc(operation: &'static str, phase: impl ToString) -> Arc<Self> {
        Arc::new(Self::PhaseOrder {
            operation,
            phase: phase.to_string(),
        })
    }

    /// Construct an invariant error wrapped in an [`Arc`].
    #[must_use]
    pub fn invariant_arc(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Invariant(message.into()))
    }

    /// Returns the conflicts carried by this error, flattening aggregates.
    #[must_use]
    pub fn conflicts(&self) -> Vec<&Conflict> {
        match self {
            Self::Conflict(conflict) => vec![conflict.as_ref()],
            Self::Aggregate(failures) => failures.conflicts(),
            _ => Vec::new(),
        }
    }

    /// Number of individual failures represented by this error.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        match self {
            Self::Aggregate(failures) => failures.failures().len(),
            _ => 1,
        }
    }
}
