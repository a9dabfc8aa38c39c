//! Actions postponed until every component is known.
//!
//! Some declarations refer to components that may not exist yet: a filter
//! mapped onto every servlet, a filter mapping naming a filter declared by a
//! later fragment, or a multipart marker on a class whose servlet has not been
//! registered. These are queued as [`DeferredAction`]s and replayed in
//! first-in, first-out order during the defaults phase.

use crate::{
    MergeResult, Provenance,
    descriptor::{Dispatcher, FilterMapping, MultipartConfig},
};

/// How an action is applied at replay time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionScope {
    /// Applied once for each registered component.
    AllComponents,
    /// Applied once.
    Single,
}

/// A postponed configuration step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// Map `filter` onto a URL pattern.
    MapFilterUrl {
        /// Filter name.
        filter: String,
        /// URL pattern.
        pattern: String,
        /// Dispatch kinds.
        dispatchers: Vec<Dispatcher>,
    },
    /// Map `filter` onto one servlet.
    MapFilterServlet {
        /// Filter name.
        filter: String,
        /// Servlet name.
        servlet: String,
        /// Dispatch kinds.
        dispatchers: Vec<Dispatcher>,
    },
    /// Map `filter` onto every registered servlet.
    MapFilterAllServlets {
        /// Filter name.
        filter: String,
        /// Dispatch kinds.
        dispatchers: Vec<Dispatcher>,
    },
    /// Retry a filter mapping whose filter was not yet declared.
    ResolveFilterMapping {
        /// The mapping as declared.
        mapping: FilterMapping,
        /// Source of the mapping.
        provenance: Provenance,
    },
    /// Register a listener class.
    AddListener {
        /// Listener class.
        class: String,
    },
    /// Apply multipart limits to servlets implemented by `class`.
    ApplyMultipart {
        /// Servlet class.
        class: String,
        /// Multipart limits.
        config: MultipartConfig,
    },
    /// Apply a run-as role to servlets implemented by `class`.
    ApplyRunAs {
        /// Servlet class.
        class: String,
        /// Role name.
        role: String,
    },
}

impl DeferredAction {
    /// Returns how the action is applied at replay time.
    #[must_use]
    pub const fn scope(&self) -> ActionScope {
        match self {
            Self::MapFilterAllServlets { .. }
            | Self::ApplyMultipart { .. }
            | Self::ApplyRunAs { .. } => ActionScope::AllComponents,
            Self::MapFilterUrl { .. }
            | Self::MapFilterServlet { .. }
            | Self::ResolveFilterMapping { .. }
            | Self::AddListener { .. } => ActionScope::Single,
        }
    }
}

/// Receives deferred actions during replay.
pub trait ReplayTarget {
    /// Names of the components registered so far, in registration order.
    fn registered_components(&self) -> Vec<String>;

    /// Apply `action`, once per component for
    /// [`ActionScope::AllComponents`] actions.
    ///
    /// # Errors
    ///
    /// Returns an error when the action cannot be applied; replay stops at
    /// the first failure.
    fn apply(&mut self, action: &DeferredAction, component: Option<&str>) -> MergeResult<()>;
}

/// First-in, first-out queue of deferred actions.
#[derive(Clone, Debug, Default)]
pub struct DeferredQueue {
    actions: Vec<DeferredAction>,
}

impl DeferredQueue {
    /// Append `action` to the queue.
    pub fn enqueue(&mut self, action: DeferredAction) {
        tracing::debug!(?action, "deferring action");
        self.actions.push(action);
    }

    /// Number of queued actions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Queued actions in replay order.
    pub fn iter(&self) -> impl Iterator<Item = &DeferredAction> {
        self.actions.iter()
    }

    /// Replay every action against `target` in queue order.
    ///
    /// Component lists are read from `target` afresh for each action, so
    /// components registered by earlier actions are seen by later ones.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `target`; remaining actions are
    /// not applied.
    pub fn replay<T: ReplayTarget + ?Sized>(self, target: &mut T) -> MergeResult<()> {
        for action in &self.actions {
            match action.scope() {
                ActionScope::AllComponents => {
                    for component in target.registered_components() {
                        target.apply(action, Some(&component))?;
                    }
                }
                ActionScope::Single => target.apply(action, None)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
