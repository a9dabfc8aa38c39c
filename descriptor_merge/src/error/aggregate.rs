//! Failures collected over one merge and reported together.

use std::{error::Error, fmt, sync::Arc};

use super::{Conflict, MergeError};

/// Every failure recorded while merging one module, in detection order.
///
/// Nested aggregates are flattened when failures are counted, listed, or
/// displayed, so numbering always follows detection order.
///
/// # Examples
///
/// ```
/// use descriptor_merge::MergeError;
///
/// let err = MergeError::aggregate(vec![
///     MergeError::validation("com.acme.Bad", "class marked WebFilter does not implement Filter"),
///     MergeError::validation("/orders/*", "URL pattern is mapped to two servlets"),
/// ]);
/// assert_eq!(err.failure_count(), 2);
/// assert!(err.to_string().contains("\n2: Validation failed for '/orders/*'"));
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<MergeError>>);

impl AggregatedErrors {
    /// Collect `failures`, keeping their order.
    #[must_use]
    pub const fn new(failures: Vec<Arc<MergeError>>) -> Self {
        Self(failures)
    }

    /// Direct members of the aggregate, without flattening.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &MergeError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of direct members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Individual failures with nested aggregates expanded in place.
    #[must_use]
    pub fn failures(&self) -> Vec<&MergeError> {
        let mut leaves = Vec::with_capacity(self.0.len());
        for member in &self.0 {
            match member.as_ref() {
                MergeError::Aggregate(nested) => leaves.extend(nested.failures()),
                other => leaves.push(other),
            }
        }
        leaves
    }

    /// Fragment/fragment conflicts among the failures.
    #[must_use]
    pub fn conflicts(&self) -> Vec<&Conflict> {
        self.failures()
            .into_iter()
            .filter_map(|failure| match failure {
                MergeError::Conflict(conflict) => Some(conflict.as_ref()),
                _ => None,
            })
            .collect()
    }

    /// Consume the aggregate, returning its direct members.
    #[must_use]
    pub fn into_vec(self) -> Vec<Arc<MergeError>> {
        self.0
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for (number, failure) in (1..).zip(self.failures()) {
            write!(f, "{separator}{number}: {failure}")?;
            separator = "\n";
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}
