//! Recorded values with their provenance and comparison rule.

use crate::{Provenance, SourceTier};

/// Equality rule used when comparing a recorded value with a candidate.
pub type Comparator<T> = fn(&T, &T) -> bool;

/// A value recorded in the merge context, remembering where it came from.
///
/// Each item carries its own comparator so structured values, such as a
/// reference declaration, can ignore fields that are merged rather than
/// compared.
#[derive(Clone, Debug)]
pub struct ConfigItem<T> {
    value: Option<T>,
    provenance: Provenance,
    compare: Comparator<T>,
}

impl<T: PartialEq> ConfigItem<T> {
    /// Record `value` using its [`PartialEq`] implementation for comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use descriptor_merge::{ConfigItem, Provenance, SourceTier};
    /// let item = ConfigItem::new(Some(30_u32), Provenance::primary());
    /// assert_eq!(item.tier(), SourceTier::Primary);
    /// assert!(item.compare_value(Some(&30)));
    /// assert!(!item.compare_value(None));
    /// ```
    #[must_use]
    pub fn new(value: Option<T>, provenance: Provenance) -> Self {
        Self::with_comparator(value, provenance, <T as PartialEq>::eq)
    }
}

impl<T> ConfigItem<T> {
    /// Record `value` with an explicit comparator.
    #[must_use]
    pub const fn with_comparator(
        value: Option<T>,
        provenance: Provenance,
        compare: Comparator<T>,
    ) -> Self {
        Self {
            value,
            provenance,
            compare,
        }
    }

    /// Returns the recorded value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the provenance of the recorded value.
    #[must_use]
    pub const fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Returns the tier that supplied the recorded value.
    #[must_use]
    pub const fn tier(&self) -> SourceTier {
        self.provenance.tier()
    }

    /// Returns the fragment identity that supplied the recorded value.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.provenance.origin()
    }

    /// Compare the recorded value with `candidate`.
    ///
    /// Two absent values are equal; an absent value never equals a present
    /// one. Present values are compared with the item's comparator.
    #[must_use]
    pub fn compare_value(&self, candidate: Option<&T>) -> bool {
        match (self.value.as_ref(), candidate) {
            (None, None) => true,
            (Some(recorded), Some(other)) => {
                std::ptr::eq(recorded, other) || (self.compare)(recorded, other)
            }
            _ => false,
        }
    }
}
