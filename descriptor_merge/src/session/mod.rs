//! Phase-ordered merge of one module's descriptors.
//!
//! A [`MergeSession`] moves through a fixed sequence of phases:
//!
//! ```text
//! Created -> Initialized -> Primary -> (FragmentDescriptor -> FragmentDiscovered)*
//!         -> Defaults -> Binding -> Extension -> finish
//! ```
//!
//! The fragment phases are skipped when the primary descriptor declares the
//! module complete. The merge context is cleared on entry to the binding
//! phase, so override values are never validated against merged values.
//! Calling a phase method out of order fails with [`MergeError::PhaseOrder`].

mod components;
mod discovered;
mod mappings;
mod outcome;
mod overrides;
mod references;
mod replay;
mod settings;

use std::{fmt, sync::Arc};

use indexmap::IndexSet;

use crate::{
    CapabilityCheck, ConfigItem, Discovery, IdGenerator, MergeError, MergeOptions, MergeResult,
    ModuleConfig, Provenance,
    context::{ItemKey, MergeContext},
    deferred::DeferredQueue,
    descriptor::{Fragment, LIBRARY_PREFIX, ModuleDescriptor, ModuleInputs},
    validate::{ConflictLog, Diagnostic, FieldLabel, Verdict, validate_duplicate},
};

pub use outcome::MergedModule;

const MODULE_ID_PREFIX: &str = "ModuleGeneratedId";

/// Position of a session in the merge state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    /// Nothing has been merged.
    Created,
    /// Module-level facts are recorded.
    Initialized,
    /// The primary descriptor is merged.
    Primary,
    /// The descriptor of the named fragment is merged.
    FragmentDescriptor(String),
    /// Discovered facts of the named fragment are merged.
    FragmentDiscovered(String),
    /// Deferred actions are replayed and defaults applied.
    Defaults,
    /// Binding overrides are applied.
    Binding,
    /// Extension overrides are applied.
    Extension,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Initialized => f.write_str("initialized"),
            Self::Primary => f.write_str("primary"),
            Self::FragmentDescriptor(identity) => write!(f, "fragment '{identity}'"),
            Self::FragmentDiscovered(identity) => write!(f, "discovery '{identity}'"),
            Self::Defaults => f.write_str("defaults"),
            Self::Binding => f.write_str("binding"),
            Self::Extension => f.write_str("extension"),
        }
    }
}

/// State of one module merge.
///
/// Most callers use [`merge_module`]; the phase methods are public so hosts
/// can interleave their own work between phases.
pub struct MergeSession<'a> {
    options: MergeOptions,
    discovery: &'a dyn Discovery,
    capabilities: &'a dyn CapabilityCheck,
    metadata_complete: bool,
    phase: Phase,
    current: Provenance,
    context: MergeContext,
    log: ConflictLog,
    ids: IdGenerator,
    deferred: DeferredQueue,
    scanning_required: IndexSet<String>,
    config: ModuleConfig,
}

impl fmt::Debug for MergeSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeSession")
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("context", &self.context)
            .field("deferred", &self.deferred.len())
            .field("errors", &self.log.errors().len())
            .finish_non_exhaustive()
    }
}

impl<'a> MergeSession<'a> {
    /// Start a session for a module.
    ///
    /// `metadata_complete` reflects the primary descriptor: when set, fragment
    /// descriptors and discovered facts are not merged.
    #[must_use]
    pub fn new(
        options: MergeOptions,
        discovery: &'a dyn Discovery,
        capabilities: &'a dyn CapabilityCheck,
        metadata_complete: bool,
    ) -> Self {
        Self {
            options,
            discovery,
            capabilities,
            metadata_complete,
            phase: Phase::Created,
            current: Provenance::primary(),
            context: MergeContext::default(),
            log: ConflictLog::default(),
            ids: IdGenerator::default(),
            deferred: DeferredQueue::default(),
            scanning_required: IndexSet::new(),
            config: ModuleConfig::default(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Provenance assigned to values merged in the current phase.
    #[must_use]
    pub const fn current_provenance(&self) -> &Provenance {
        &self.current
    }

    /// The configuration merged so far.
    #[must_use]
    pub const fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// The merge context.
    #[must_use]
    pub const fn context(&self) -> &MergeContext {
        &self.context
    }

    /// Actions waiting for the defaults phase.
    #[must_use]
    pub const fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    /// Errors accumulated so far.
    #[must_use]
    pub fn errors(&self) -> &[Arc<MergeError>] {
        self.log.errors()
    }

    /// Diagnostics accumulated so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.log.diagnostics()
    }

    /// Wrap `value` in a [`ConfigItem`] attributed to the current phase.
    #[must_use]
    pub fn create_config_item<T: PartialEq>(&self, value: Option<T>) -> ConfigItem<T> {
        ConfigItem::new(value, self.current.clone())
    }

    /// Record module-level facts: identifier, level, and library order.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PhaseOrder`] unless the session was just created.
    pub fn configure_init(&mut self, fragments: &[Fragment]) -> MergeResult<()> {
        self.enter("initialize", |p| matches!(p, Phase::Created), Phase::Initialized)?;
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        self.config.id = self.ids.generate(MODULE_ID_PREFIX);
        self.config.module_name.clone_from(&self.options.module_name);
        self.config.servlet_level = self.options.servlet_level;
        self.config.metadata_complete = self.metadata_complete;
        self.config.ordered_lib_paths = fragments
            .iter()
            .filter_map(|fragment| fragment.identity.strip_prefix(LIBRARY_PREFIX))
            .filter(|jar| !jar.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(())
    }

    /// Merge the primary descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PhaseOrder`] unless the session is initialized,
    /// or any fail-fast error raised while merging.
    pub fn configure_primary(&mut self, descriptor: &ModuleDescriptor) -> MergeResult<()> {
        self.enter(
            "merge the primary descriptor",
            |p| matches!(p, Phase::Initialized),
            Phase::Primary,
        )?;
        self.current = Provenance::primary();
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        self.configure_module_names(descriptor);
        self.configure_primary_distributable(descriptor.distributable);
        self.merge_descriptor(descriptor)
    }

    /// Merge the descriptor of `fragment`, if it has one.
    ///
    /// Does nothing when the module is complete.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PhaseOrder`] unless the primary descriptor or the
    /// previous fragment's discovered facts were just merged.
    pub fn configure_fragment(&mut self, fragment: &Fragment) -> MergeResult<()> {
        if self.metadata_complete {
            tracing::debug!(fragment = %fragment.identity, "module is complete; fragment skipped");
            return Ok(());
        }
        self.enter(
            "merge a fragment descriptor",
            |p| matches!(p, Phase::Primary | Phase::FragmentDiscovered(_)),
            Phase::FragmentDescriptor(fragment.identity.clone()),
        )?;
        self.current = Provenance::fragment(fragment.identity.clone());
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        let Some(descriptor) = &fragment.descriptor else {
            return Ok(());
        };
        self.configure_fragment_distributable(descriptor.distributable);
        self.merge_descriptor(descriptor)
    }

    /// Merge facts discovered in the classes of `fragment`.
    ///
    /// Does nothing when the module is complete, and scans nothing when the
    /// fragment itself is complete.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PhaseOrder`] unless the same fragment's
    /// descriptor was just merged, or [`MergeError::Collaborator`] when
    /// discovery fails.
    pub fn configure_fragment_discovered(&mut self, fragment: &Fragment) -> MergeResult<()> {
        if self.metadata_complete {
            return Ok(());
        }
        self.enter(
            "merge discovered facts",
            |p| matches!(p, Phase::FragmentDescriptor(identity) if *identity == fragment.identity),
            Phase::FragmentDiscovered(fragment.identity.clone()),
        )?;
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        if fragment.metadata_complete {
            tracing::debug!(fragment = %fragment.identity, "fragment is complete; classes not scanned");
            return Ok(());
        }
        self.current = Provenance::discovered(Some(fragment.identity.clone()));
        self.scan_fragment(&fragment.identity)
    }

    /// Resolve referenced classes, replay deferred actions, and fill defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PhaseOrder`] when called before the primary
    /// descriptor or in the middle of a fragment, or the first error raised by
    /// a deferred action.
    pub fn configure_defaults(&mut self) -> MergeResult<()> {
        self.enter(
            "apply defaults",
            |p| matches!(p, Phase::Primary | Phase::FragmentDiscovered(_)),
            Phase::Defaults,
        )?;
        self.current = Provenance::discovered(None);
        let _span = tracing::debug_span!("merge_phase", phase = %self.phase).entered();
        self.configure_specified_classes()?;
        self.replay_deferred()?;
        self.apply_default_values();
        Ok(())
    }

    /// Freeze the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::PhaseOrder`] unless the extension phase has run.
    /// When errors were accumulated, returns them all as one error, aggregated
    /// in detection order; nothing is published in that case.
    pub fn finish(self) -> MergeResult<MergedModule> {
        if self.phase != Phase::Extension {
            return Err(MergeError::phase_order_arc("finish the merge", &self.phase));
        }
        let (errors, diagnostics) = self.log.into_parts();
        if let Some(err) = MergeError::try_aggregate(errors) {
            tracing::debug!(failures = err.failure_count(), module = %self.config.id, "merge failed");
            return Err(Arc::new(err));
        }
        tracing::debug!(
            module = %self.config.id,
            servlets = self.config.servlets.len(),
            filters = self.config.filters.len(),
            diagnostics = diagnostics.len(),
            "merge finished"
        );
        Ok(MergedModule::new(self.config, diagnostics))
    }

    fn enter(
        &mut self,
        operation: &'static str,
        allowed: impl FnOnce(&Phase) -> bool,
        next: Phase,
    ) -> MergeResult<()> {
        if !allowed(&self.phase) {
            return Err(MergeError::phase_order_arc(operation, &self.phase));
        }
        self.phase = next;
        Ok(())
    }

    fn merge_descriptor(&mut self, descriptor: &ModuleDescriptor) -> MergeResult<()> {
        self.configure_context_params(&descriptor.context_params)?;
        self.configure_error_pages(&descriptor.error_pages)?;
        self.configure_mime_mappings(&descriptor.mime_mappings)?;
        self.configure_welcome_files(&descriptor.welcome_files)?;
        if let Some(session) = &descriptor.session_config {
            self.configure_session_config(session)?;
        }
        self.configure_locale_encodings(&descriptor.locale_encodings)?;
        self.configure_servlets(&descriptor.servlets)?;
        self.configure_servlet_mappings(&descriptor.servlet_mappings)?;
        self.configure_filters(&descriptor.filters)?;
        self.configure_filter_mappings(&descriptor.filter_mappings)?;
        self.configure_listeners(&descriptor.listeners)?;
        self.configure_references(&descriptor.references)?;
        self.configure_data_sources(&descriptor.data_sources)
    }

    /// Record `value` under `lookup` unless a value is already recorded, in
    /// which case the two are validated against each other.
    ///
    /// `apply` writes the value into the output configuration; it runs only
    /// when the value is recorded.
    fn merge_setting<T, F>(
        &mut self,
        key: ItemKey<T>,
        lookup: &str,
        label: &FieldLabel<'_>,
        value: T,
        apply: F,
    ) -> MergeResult<()>
    where
        T: fmt::Display + PartialEq + 'static,
        F: FnOnce(&mut ModuleConfig, &T),
    {
        let items = self.context.items(key)?;
        if let Some(recorded) = items.get(lookup) {
            let verdict =
                validate_duplicate(&mut self.log, label, recorded, Some(&value), &self.current)?;
            if verdict != Verdict::Replace {
                return Ok(());
            }
        }
        apply(&mut self.config, &value);
        items.insert(lookup.to_owned(), ConfigItem::new(Some(value), self.current.clone()));
        Ok(())
    }

    fn require_scan(&mut self, class: &str) {
        if !self.metadata_complete {
            self.scanning_required.insert(class.to_owned());
        }
    }

    fn mark_scanned(&mut self, classes: &IndexSet<String>) {
        for class in classes {
            self.scanning_required.shift_remove(class);
        }
    }
}

/// Merge a module from its descriptors, discovered facts, and overrides.
///
/// Runs every phase in order and publishes the merged configuration only if
/// no conflict or validation error was recorded.
///
/// # Errors
///
/// Returns the first fail-fast error, such as a discovery failure, or the
/// aggregate of every conflict and validation error found.
pub fn merge_module(
    inputs: &ModuleInputs,
    discovery: &dyn Discovery,
    capabilities: &dyn CapabilityCheck,
    options: MergeOptions,
) -> MergeResult<MergedModule> {
    let mut session = MergeSession::new(options, discovery, capabilities, inputs.metadata_complete);
    session.configure_init(&inputs.fragments)?;
    session.configure_primary(&inputs.primary)?;
    if !inputs.metadata_complete {
        for fragment in &inputs.fragments {
            session.configure_fragment(fragment)?;
            session.configure_fragment_discovered(fragment)?;
        }
    }
    session.configure_defaults()?;
    session.configure_binding(inputs.binding.as_ref())?;
    session.configure_extension(inputs.extension.as_ref())?;
    session.finish()
}

#[cfg(test)]
mod tests;
