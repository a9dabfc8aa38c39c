//! Replay of deferred actions during the defaults phase.

use super::MergeSession;
use crate::{
    MappingTarget, MergeError, MergeResult,
    context::keys,
    deferred::{DeferredAction, ReplayTarget},
    validate::FieldLabel,
};

impl MergeSession<'_> {
    /// Replay queued actions until the queue stays empty.
    ///
    /// Replaying an action may scan a class, which can queue further actions.
    pub(super) fn replay_deferred(&mut self) -> MergeResult<()> {
        while !self.deferred.is_empty() {
            let queue = std::mem::take(&mut self.deferred);
            tracing::debug!(actions = queue.len(), "replaying deferred actions");
            queue.replay(self)?;
        }
        Ok(())
    }

    fn configure_filter_class(&mut self, filter: &str) -> MergeResult<()> {
        let Some(class) = self.config.filter(filter).and_then(|f| f.class.clone()) else {
            return Ok(());
        };
        self.configure_specific_class(&class)
    }

    fn servlet_implements(&self, servlet: &str, class: &str) -> bool {
        self.config
            .servlet(servlet)
            .and_then(|s| s.class.as_deref())
            .is_some_and(|declared| declared == class)
    }
}

impl ReplayTarget for MergeSession<'_> {
    fn registered_components(&self) -> Vec<String> {
        self.config.servlets.keys().cloned().collect()
    }

    fn apply(&mut self, action: &DeferredAction, component: Option<&str>) -> MergeResult<()> {
        match (action, component) {
            (DeferredAction::MapFilterUrl { filter, pattern, dispatchers }, _) => {
                self.push_filter_mapping(filter, MappingTarget::UrlPattern(pattern.clone()), dispatchers);
                self.configure_filter_class(filter)
            }
            (DeferredAction::MapFilterServlet { filter, servlet, dispatchers }, _) => {
                self.push_filter_mapping(filter, MappingTarget::ServletName(servlet.clone()), dispatchers);
                self.configure_filter_class(filter)
            }
            (DeferredAction::MapFilterAllServlets { filter, dispatchers }, Some(servlet)) => {
                self.push_filter_mapping(filter, MappingTarget::ServletName(servlet.to_owned()), dispatchers);
                self.configure_filter_class(filter)
            }
            (DeferredAction::ResolveFilterMapping { mapping, provenance }, _) => {
                self.configure_filter_mapping(mapping, provenance, true)?;
                self.configure_filter_class(&mapping.filter)
            }
            (DeferredAction::AddListener { class }, _) => {
                self.config.listeners.push(class.clone());
                self.configure_specific_class(class)
            }
            (DeferredAction::ApplyMultipart { class, config }, Some(servlet)) => {
                if !self.servlet_implements(servlet, class) {
                    return Ok(());
                }
                let label = FieldLabel::keyed("servlet", "servlet-name", servlet, "multipart-config");
                self.merge_setting(keys::MULTIPART, servlet, &label, config.clone(), |module, value| {
                    if let Some(entry) = module.servlet_mut(servlet) {
                        entry.multipart = Some(value.clone());
                    }
                })
            }
            (DeferredAction::ApplyRunAs { class, role }, Some(servlet)) => {
                if !self.servlet_implements(servlet, class) {
                    return Ok(());
                }
                self.configure_run_as(servlet, role)
            }
            (
                DeferredAction::MapFilterAllServlets { .. }
                | DeferredAction::ApplyMultipart { .. }
                | DeferredAction::ApplyRunAs { .. },
                None,
            ) => Err(MergeError::invariant_arc(format!(
                "{action:?} replayed without a servlet"
            ))),
        }
    }
}
