//! Structured description of a fragment/fragment conflict.

use std::fmt;

/// Two fragments declared different values for one field.
///
/// Both values are kept in rendered form so the conflict can be reported
/// after the descriptors themselves have been dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conflict {
    /// Element path of the conflicting field, such as `session-config.session-timeout`.
    pub field: String,
    /// Key value for keyed elements, such as a parameter name.
    pub key: Option<String>,
    /// Value recorded first.
    pub first_value: String,
    /// Fragment that supplied the first value.
    pub first_origin: String,
    /// Value that conflicted with the recorded one.
    pub second_value: String,
    /// Fragment that supplied the conflicting value.
    pub second_origin: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conflicting values for {}", self.field)?;
        if let Some(key) = &self.key {
            write!(f, " [{key}]")?;
        }
        write!(
            f,
            ": '{}' in {} and '{}' in {}",
            self.first_value, self.first_origin, self.second_value, self.second_origin
        )
    }
}
