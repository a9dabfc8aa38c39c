//! Binding and extension overrides.
//!
//! Overrides are applied after defaults. They are keyed by reference name
//! and replace merged values outright; a repeated override replaces the
//! earlier one.

use super::{MergeSession, Phase};
use crate::{
    ConfigItem, MergeResult, Provenance,
    context::{ItemKey, keys},
    descriptor::{
        BindingDescriptor, ExtensionDescriptor, ParamValue, ReferenceBinding, ReferenceKind,
        ResourceRefExtension,
    },
};

impl MergeSession<'_> {
    /// Apply binding overrides.
    ///
    /// The merge context is cleared first, so overrides are never validated
    /// against merged values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::PhaseOrder`] unless defaults were just
    /// applied.
    pub fn configure_binding(&mut self, binding: Option<&BindingDescriptor>) -> MergeResult<()> {
        self.enter(
            "apply binding overrides",
            |p| matches!(p, Phase::Defaults),
            Phase::Binding,
        )?;
        self.context.clear();
        self.current = Provenance::binding();
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        let Some(binding) = binding else {
            return Ok(());
        };
        if let Some(host) = &binding.virtual_host {
            self.record_override(keys::BINDING, "virtual-host", host.clone())?;
            self.config.virtual_host = Some(host.clone());
        }
        for reference in &binding.reference_bindings {
            self.configure_reference_binding(reference)?;
        }
        for value in &binding.env_entry_values {
            self.configure_env_entry_value(value)?;
        }
        Ok(())
    }

    /// Apply extension overrides to resource references.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::PhaseOrder`] unless binding overrides were
    /// just applied.
    pub fn configure_extension(&mut self, extension: Option<&ExtensionDescriptor>) -> MergeResult<()> {
        self.enter(
            "apply extension overrides",
            |p| matches!(p, Phase::Binding),
            Phase::Extension,
        )?;
        self.current = Provenance::extension();
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        let Some(extension) = extension else {
            return Ok(());
        };
        for tuning in &extension.resource_refs {
            self.configure_resource_ref_extension(tuning)?;
        }
        Ok(())
    }

    fn configure_reference_binding(&mut self, binding: &ReferenceBinding) -> MergeResult<()> {
        let Some(entry) = self.config.reference_mut(binding.kind, &binding.name) else {
            tracing::debug!(
                reference = %binding.kind,
                name = %binding.name,
                "binding names an undeclared reference; ignored"
            );
            return Ok(());
        };
        entry.binding_name = Some(binding.binding_name.clone());
        let lookup = format!("{}:{}", binding.kind.element(), binding.name);
        self.record_override(keys::BINDING, &lookup, binding.binding_name.clone())
    }

    fn configure_env_entry_value(&mut self, value: &ParamValue) -> MergeResult<()> {
        let Some(entry) = self.config.reference_mut(ReferenceKind::EnvEntry, &value.name) else {
            tracing::debug!(name = %value.name, "binding value names an undeclared env-entry; ignored");
            return Ok(());
        };
        entry.value = Some(value.value.clone());
        let lookup = format!("env-entry-value:{}", value.name);
        self.record_override(keys::BINDING, &lookup, value.value.clone())
    }

    fn configure_resource_ref_extension(&mut self, tuning: &ResourceRefExtension) -> MergeResult<()> {
        let Some(entry) = self.config.reference_mut(ReferenceKind::ResourceRef, &tuning.name) else {
            tracing::debug!(name = %tuning.name, "extension names an undeclared resource-ref; ignored");
            return Ok(());
        };
        entry.extension = Some(tuning.clone());
        self.record_override(keys::EXTENSION, &tuning.name, tuning.clone())
    }

    fn record_override<T: 'static>(&mut self, key: ItemKey<T>, lookup: &str, value: T) -> MergeResult<()> {
        let item = ConfigItem::with_comparator(Some(value), self.current.clone(), |_, _| false);
        let previous = self.context.items(key)?.insert(lookup.to_owned(), item);
        if previous.is_some() {
            tracing::debug!(setting = lookup, origin = %self.current, "earlier override replaced");
        }
        Ok(())
    }
}
