//! Duplicate-value validation between sources of different tiers.
//!
//! When a value arrives for a field that already holds a recorded value, the
//! outcome depends on the tiers of both sources:
//!
//! | recorded  | incoming   | equal values | different values            |
//! |-----------|------------|--------------|-----------------------------|
//! | primary   | primary    | ignored      | ignored                     |
//! | primary   | fragment   | pass         | soft: primary kept, logged  |
//! | fragment  | fragment   | pass         | hard: conflict recorded     |
//! | primary   | discovered | ignored      | ignored                     |
//! | fragment  | discovered | ignored      | ignored                     |
//! | discovered| fragment   | replace      | replace                     |
//! | discovered| discovered | ignored      | ignored                     |
//!
//! Hard conflicts are recorded in the [`ConflictLog`] rather than returned,
//! so a single merge reports every conflict it finds.

mod log;

use std::fmt;

use crate::{ConfigItem, Conflict, MergeError, MergeResult, Provenance, SourceTier};

pub use log::{ConflictLog, Diagnostic};

/// Names the field being validated, for diagnostics and conflict reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldLabel<'a> {
    /// A single-valued element, such as `session-config/session-timeout`.
    Scalar {
        /// Parent element.
        parent: &'a str,
        /// Element holding the value.
        element: &'a str,
    },
    /// A value keyed by a sibling element, such as an init parameter.
    Keyed {
        /// Parent element.
        parent: &'a str,
        /// Element holding the key.
        key_element: &'a str,
        /// Key value.
        key: &'a str,
        /// Element holding the value.
        value_element: &'a str,
    },
    /// The location of the error page declared without code or exception type.
    DefaultLocation,
}

impl<'a> FieldLabel<'a> {
    /// Label for a single-valued element.
    #[must_use]
    pub const fn scalar(parent: &'a str, element: &'a str) -> Self {
        Self::Scalar { parent, element }
    }

    /// Label for a value keyed by `key`.
    #[must_use]
    pub const fn keyed(
        parent: &'a str,
        key_element: &'a str,
        key: &'a str,
        value_element: &'a str,
    ) -> Self {
        Self::Keyed {
            parent,
            key_element,
            key,
            value_element,
        }
    }

    /// Label for the default error page location.
    #[must_use]
    pub const fn default_location() -> Self {
        Self::DefaultLocation
    }

    /// Element path of the labelled field.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Scalar { parent, element } => format!("{parent}.{element}"),
            Self::Keyed {
                parent,
                value_element,
                ..
            } => format!("{parent}.{value_element}"),
            Self::DefaultLocation => "error-page.location".to_owned(),
        }
    }

    /// Key of the labelled field, for keyed elements.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        match self {
            Self::Keyed { key, .. } => Some((*key).to_owned()),
            Self::Scalar { .. } | Self::DefaultLocation => None,
        }
    }
}

impl fmt::Display for FieldLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyed {
                key_element, key, ..
            } => write!(f, "{} ({key_element}={key})", self.path()),
            Self::Scalar { .. } | Self::DefaultLocation => f.write_str(&self.path()),
        }
    }
}

/// Outcome of validating a duplicate value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The values agree.
    Pass,
    /// The recorded primary value wins; the incoming value was reported as a
    /// diagnostic.
    Soft,
    /// Two fragments disagree; a conflict was recorded.
    Hard,
    /// The incoming value is not compared and the recorded value stays.
    Ignored,
    /// The incoming descriptor value outranks a recorded discovered value and
    /// replaces it.
    Replace,
}

/// Validate `candidate` from `provenance` against the `recorded` value.
///
/// # Errors
///
/// Returns [`MergeError::Invariant`] when a primary value arrives after a
/// fragment value, or when an override tier is validated. Disagreements
/// between two fragments are recorded in `log` and reported as
/// [`Verdict::Hard`]; a fragment repeating its own key keeps the first value.
pub fn validate_duplicate<T: fmt::Display>(
    log: &mut ConflictLog,
    label: &FieldLabel<'_>,
    recorded: &ConfigItem<T>,
    candidate: Option<&T>,
    provenance: &Provenance,
) -> MergeResult<Verdict> {
    let equal = recorded.compare_value(candidate);
    match (recorded.tier(), provenance.tier()) {
        (SourceTier::Primary, SourceTier::Primary) => {
            tracing::debug!(field = %label, "duplicate primary declaration ignored");
            Ok(Verdict::Ignored)
        }
        (SourceTier::Primary | SourceTier::Fragment, SourceTier::Fragment) if equal => {
            Ok(Verdict::Pass)
        }
        (SourceTier::Primary, SourceTier::Fragment) => {
            log.record_soft(Diagnostic {
                field: label.path(),
                key: label.key(),
                kept_value: render(recorded.value()),
                ignored_value: render(candidate),
                ignored_origin: provenance.to_string(),
            });
            Ok(Verdict::Soft)
        }
        (SourceTier::Fragment, SourceTier::Fragment)
            if recorded.provenance().same_origin(provenance) =>
        {
            tracing::debug!(
                field = %label,
                origin = %provenance,
                "fragment repeats a declaration; later value ignored"
            );
            Ok(Verdict::Ignored)
        }
        (SourceTier::Fragment, SourceTier::Fragment) => {
            log.record_conflict(Conflict {
                field: label.path(),
                key: label.key(),
                first_value: render(recorded.value()),
                first_origin: recorded.provenance().to_string(),
                second_value: render(candidate),
                second_origin: provenance.to_string(),
            });
            Ok(Verdict::Hard)
        }
        (SourceTier::Discovered, SourceTier::Primary | SourceTier::Fragment) => {
            tracing::debug!(
                field = %label,
                replaced = %recorded.provenance(),
                by = %provenance,
                "descriptor value replaces discovered value"
            );
            Ok(Verdict::Replace)
        }
        (SourceTier::Primary | SourceTier::Fragment | SourceTier::Discovered, SourceTier::Discovered) => {
            tracing::debug!(
                field = %label,
                kept = %recorded.provenance(),
                ignored = %provenance,
                "value already recorded; incoming value ignored"
            );
            Ok(Verdict::Ignored)
        }
        (recorded_tier, incoming_tier) => Err(MergeError::invariant_arc(format!(
            "{label}: cannot validate a {incoming_tier} value against a {recorded_tier} value"
        ))),
    }
}

fn render<T: fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "null".to_owned(), ToString::to_string)
}
