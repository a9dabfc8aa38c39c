//! Source tiers and provenance for merged values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rank of the source that supplied a value.
///
/// The main merge pass only ever sees [`SourceTier::Primary`],
/// [`SourceTier::Fragment`], and [`SourceTier::Discovered`]; their relative
/// precedence is decided by [`SourceTier::outranks`]. Binding and extension
/// values are applied after the merge context has been cleared and never take
/// part in conflict validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum SourceTier {
    /// The module's own deployment descriptor.
    Primary,
    /// A library fragment descriptor.
    Fragment,
    /// Facts discovered by scanning classes.
    Discovered,
    /// Deployment-time binding overrides.
    Binding,
    /// Deployment-time extension overrides.
    Extension,
}

impl SourceTier {
    /// Precedence within the main merge pass, or `None` for override tiers.
    #[must_use]
    pub const fn precedence(self) -> Option<u8> {
        match self {
            Self::Primary => Some(3),
            Self::Fragment => Some(2),
            Self::Discovered => Some(1),
            Self::Binding | Self::Extension => None,
        }
    }

    /// Returns `true` when values from `self` beat values from `other`.
    ///
    /// Override tiers never outrank and are never outranked.
    ///
    /// # Examples
    ///
    /// ```
    /// use descriptor_merge::SourceTier;
    /// assert!(SourceTier::Primary.outranks(SourceTier::Fragment));
    /// assert!(SourceTier::Fragment.outranks(SourceTier::Discovered));
    /// assert!(!SourceTier::Fragment.outranks(SourceTier::Fragment));
    /// ```
    #[must_use]
    pub const fn outranks(self, other: Self) -> bool {
        match (self.precedence(), other.precedence()) {
            (Some(lhs), Some(rhs)) => lhs > rhs,
            _ => false,
        }
    }

    /// Returns `true` for the binding and extension tiers.
    #[must_use]
    pub const fn is_override(self) -> bool {
        matches!(self, Self::Binding | Self::Extension)
    }

    /// Stable lowercase name of the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fragment => "fragment",
            Self::Discovered => "discovered",
            Self::Binding => "binding",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier plus the identity of the fragment that supplied a value.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Provenance {
    tier: SourceTier,
    origin: Option<String>,
}

impl Provenance {
    /// Provenance of values from the primary descriptor.
    #[must_use]
    pub const fn primary() -> Self {
        Self {
            tier: SourceTier::Primary,
            origin: None,
        }
    }

    /// Provenance of values declared by the fragment named `identity`.
    #[must_use]
    pub fn fragment(identity: impl Into<String>) -> Self {
        Self {
            tier: SourceTier::Fragment,
            origin: Some(identity.into()),
        }
    }

    /// Provenance of values discovered by scanning classes.
    ///
    /// `identity` names the fragment whose classes were scanned, or is `None`
    /// for classes resolved on demand outside any fragment scan.
    #[must_use]
    pub const fn discovered(identity: Option<String>) -> Self {
        Self {
            tier: SourceTier::Discovered,
            origin: identity,
        }
    }

    /// Provenance of binding overrides.
    #[must_use]
    pub const fn binding() -> Self {
        Self {
            tier: SourceTier::Binding,
            origin: None,
        }
    }

    /// Provenance of extension overrides.
    #[must_use]
    pub const fn extension() -> Self {
        Self {
            tier: SourceTier::Extension,
            origin: None,
        }
    }

    /// Returns the tier of this provenance.
    #[must_use]
    pub const fn tier(&self) -> SourceTier {
        self.tier
    }

    /// Returns the fragment identity, when one is known.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Returns `true` when both provenances name the same tier and fragment.
    #[must_use]
    pub fn same_origin(&self, other: &Self) -> bool {
        self == other
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tier, self.origin()) {
            (SourceTier::Primary, _) => f.write_str("the primary descriptor"),
            (SourceTier::Fragment, Some(origin)) => write!(f, "web fragment '{origin}'"),
            (SourceTier::Discovered, Some(origin)) => write!(f, "annotations in '{origin}'"),
            (SourceTier::Discovered, None) => f.write_str("annotations on referenced classes"),
            (tier, Some(origin)) => write!(f, "{tier} '{origin}'"),
            (tier, None) => write!(f, "{tier} overrides"),
        }
    }
}
