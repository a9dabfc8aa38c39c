//! Accumulated findings of a merge session.

use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::{Conflict, MergeError};

/// A primary value overrode a differing fragment value.
///
/// Diagnostics are informational: the merge still succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Diagnostic {
    /// Element path of the field.
    pub field: String,
    /// Key value for keyed elements.
    pub key: Option<String>,
    /// Primary value that was kept.
    pub kept_value: String,
    /// Fragment value that was ignored.
    pub ignored_value: String,
    /// Source of the ignored value.
    pub ignored_origin: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field)?;
        if let Some(key) = &self.key {
            write!(f, " [{key}]")?;
        }
        write!(
            f,
            ": keeping '{}' from the primary descriptor; ignoring '{}' from {}",
            self.kept_value, self.ignored_value, self.ignored_origin
        )
    }
}

/// Errors and diagnostics accumulated while merging one module.
#[derive(Debug, Default)]
pub struct ConflictLog {
    errors: Vec<Arc<MergeError>>,
    diagnostics: Vec<Diagnostic>,
}

impl ConflictLog {
    /// Record a fragment/fragment conflict.
    pub fn record_conflict(&mut self, conflict: Conflict) {
        tracing::error!(
            field = %conflict.field,
            key = ?conflict.key,
            first = %conflict.first_origin,
            second = %conflict.second_origin,
            "conflicting fragment values"
        );
        self.errors.push(Arc::new(MergeError::conflict(conflict)));
    }

    /// Record a validation failure for `key`.
    pub fn record_validation(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let err = MergeError::validation(key, message);
        tracing::error!(error = %err, "descriptor validation failed");
        self.errors.push(Arc::new(err));
    }

    /// Record a primary-over-fragment override.
    pub fn record_soft(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "fragment value overridden by primary descriptor");
        self.diagnostics.push(diagnostic);
    }

    /// Errors recorded so far, in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[Arc<MergeError>] {
        &self.errors
    }

    /// Diagnostics recorded so far, in the order they were found.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` when at least one error has been recorded.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Split the log into its errors and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Arc<MergeError>>, Vec<Diagnostic>) {
        (self.errors, self.diagnostics)
    }
}
