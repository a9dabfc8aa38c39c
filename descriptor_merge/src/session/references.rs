//! Environment entries and resource references.

use super::MergeSession;
use crate::{
    ConfigItem, MergeError, MergeResult, ReferenceConfig, SourceTier,
    descriptor::Reference,
    validate::{FieldLabel, Verdict, validate_duplicate},
};

impl MergeSession<'_> {
    pub(super) fn configure_references(&mut self, references: &[Reference]) -> MergeResult<()> {
        for reference in references.iter().filter(|r| !r.name.is_empty()) {
            self.configure_reference(reference)?;
        }
        Ok(())
    }

    /// Injection targets of a reference are merged across sources; every
    /// other attribute follows the usual tier rules.
    ///
    /// A fragment may add targets to a primary declaration when the servlet
    /// level allows it, or when the primary declaration named no targets of
    /// its own.
    fn configure_reference(&mut self, reference: &Reference) -> MergeResult<()> {
        let kind = reference.kind;
        let name = reference.name.as_str();
        let items = self.context.items(kind.item_key())?;
        let Some(recorded_tier) = items.get(name).map(ConfigItem::tier) else {
            items.insert(
                name.to_owned(),
                ConfigItem::with_comparator(
                    Some(reference.clone()),
                    self.current.clone(),
                    Reference::same_declaration,
                ),
            );
            self.config
                .references
                .entry(kind)
                .or_default()
                .insert(name.to_owned(), ReferenceConfig::from(reference));
            if self.current.tier() == SourceTier::Primary && reference.injection_targets.is_empty() {
                self.context.names(kind.additive_key())?.insert(name.to_owned());
            }
            return Ok(());
        };

        let label = FieldLabel::keyed(kind.element(), kind.name_element(), name, "declaration");
        let declarations = self.context.items(kind.item_key())?;
        let recorded = declarations.get(name).ok_or_else(|| {
            MergeError::invariant_arc(format!("{kind} '{name}' vanished from the merge context"))
        })?;
        let verdict = validate_duplicate(&mut self.log, &label, recorded, Some(reference), &self.current)?;
        match (recorded_tier, self.current.tier(), verdict) {
            (SourceTier::Primary, SourceTier::Fragment, _) => {
                let additive = self.options.servlet_level.merges_all_injection_targets()
                    || self.context.contains(kind.additive_key().name(), name);
                if additive {
                    self.merge_injection_targets(reference);
                } else {
                    tracing::debug!(
                        reference = %kind,
                        name,
                        origin = %self.current,
                        "fragment injection targets ignored; primary declaration names its own"
                    );
                }
            }
            (SourceTier::Fragment, _, Verdict::Pass) => self.merge_injection_targets(reference),
            _ => {}
        }
        Ok(())
    }

    fn merge_injection_targets(&mut self, reference: &Reference) {
        if let Some(entry) = self.config.reference_mut(reference.kind, &reference.name) {
            entry.merge_targets(&reference.injection_targets);
        }
    }
}
