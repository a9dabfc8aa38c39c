//! Session-scoped generator for synthetic component identifiers.

/// Issues monotonically increasing identifiers for components declared
/// without one.
///
/// Each merge session owns its own generator so two independent merges of the
/// same inputs assign identical identifiers.
///
/// # Examples
///
/// ```
/// use descriptor_merge::IdGenerator;
/// let mut ids = IdGenerator::default();
/// assert_eq!(ids.generate("ServletGeneratedId"), "ServletGeneratedId1");
/// assert_eq!(ids.generate("FilterGeneratedId"), "FilterGeneratedId2");
/// ```
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    /// Return the next number in the sequence.
    pub const fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Return `prefix` followed by the next number in the sequence.
    pub fn generate(&mut self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::IdGenerator;

    #[test]
    fn sequences_are_independent_per_generator() {
        let mut first = IdGenerator::default();
        let mut second = IdGenerator::default();
        assert_eq!(first.next_id(), 1);
        assert_eq!(first.next_id(), 2);
        assert_eq!(second.next_id(), 1);
    }
}
