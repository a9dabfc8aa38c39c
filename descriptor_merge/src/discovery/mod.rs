//! Collaborators answering class discovery and capability queries.
//!
//! The merge engine never scans archives itself. It asks a [`Discovery`]
//! implementation which classes carry a marker and what the marker says, and
//! a [`CapabilityCheck`] implementation whether a class can play a role.
//! [`StaticDiscovery`] answers both from a precomputed index.

mod annotations;
mod index;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub use annotations::{Annotation, WebFilterInfo, WebServletInfo};
pub use index::{ClassRegion, ScannedClass, StaticDiscovery};

/// Error reported by a discovery collaborator.
pub type DiscoveryError = Box<dyn std::error::Error + Send + Sync>;

/// Capability required of classes marked as servlets.
pub const HTTP_SERVLET: &str = "http-servlet";
/// Capability required of classes marked as filters.
pub const FILTER: &str = "filter";
/// Listener capabilities accepted when no override is configured.
pub const DEFAULT_LISTENER_CAPABILITIES: [&str; 6] = [
    "servlet-context-listener",
    "servlet-context-attribute-listener",
    "servlet-request-listener",
    "servlet-request-attribute-listener",
    "http-session-listener",
    "http-session-attribute-listener",
];

/// Annotation kinds the merge engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// Declares a servlet.
    WebServlet,
    /// Declares a filter.
    WebFilter,
    /// Declares a listener.
    WebListener,
    /// Declares multipart upload limits for a servlet class.
    MultipartConfig,
    /// Declares the role a servlet class runs as.
    RunAs,
}

impl Marker {
    /// Annotation name of the marker.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebServlet => "WebServlet",
            Self::WebFilter => "WebFilter",
            Self::WebListener => "WebListener",
            Self::MultipartConfig => "MultipartConfig",
            Self::RunAs => "RunAs",
        }
    }
}

/// Classes a discovery query ranges over.
#[derive(Clone, Copy, Debug)]
pub enum ScanScope<'a> {
    /// Seed classes belonging to the fragment with this identity.
    Fragment(&'a str),
    /// Exactly these classes, wherever they live.
    Classes(&'a IndexSet<String>),
}

/// Answers questions about the module's classes.
pub trait Discovery {
    /// Returns `true` when `class` is a seed class scanned with its fragment.
    fn is_included_class(&self, class: &str) -> bool;

    /// Returns `true` when `class` lives in a fragment excluded from scanning.
    fn is_excluded_class(&self, class: &str) -> bool;

    /// Returns `true` when `class` lives outside the module.
    fn is_external_class(&self, class: &str) -> bool;

    /// Classes within `scope` carrying `marker`, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscoveryError`] when the scan cannot be completed.
    fn select_annotated_classes(
        &self,
        scope: ScanScope<'_>,
        marker: Marker,
    ) -> Result<IndexSet<String>, DiscoveryError>;

    /// The `marker` annotation on `class`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscoveryError`] when the class cannot be inspected.
    fn annotation(&self, class: &str, marker: Marker) -> Result<Option<Annotation>, DiscoveryError>;
}

/// Answers whether a class can play a role.
pub trait CapabilityCheck {
    /// Returns `true` when `class` has `capability`, such as [`HTTP_SERVLET`].
    fn has_capability(&self, class: &str, capability: &str) -> bool;
}

/// Discovery for modules without scannable classes.
///
/// Every query returns an empty answer and every capability check fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDiscovery;

impl Discovery for NoDiscovery {
    fn is_included_class(&self, _class: &str) -> bool {
        false
    }

    fn is_excluded_class(&self, _class: &str) -> bool {
        false
    }

    fn is_external_class(&self, _class: &str) -> bool {
        false
    }

    fn select_annotated_classes(
        &self,
        _scope: ScanScope<'_>,
        _marker: Marker,
    ) -> Result<IndexSet<String>, DiscoveryError> {
        Ok(IndexSet::new())
    }

    fn annotation(&self, _class: &str, _marker: Marker) -> Result<Option<Annotation>, DiscoveryError> {
        Ok(None)
    }
}

impl CapabilityCheck for NoDiscovery {
    fn has_capability(&self, _class: &str, _capability: &str) -> bool {
        false
    }
}
