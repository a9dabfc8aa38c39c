//! The merged module configuration.
//!
//! Every collection is insertion-ordered so that merging the same inputs
//! twice yields identical output, down to serialization.

mod components;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    ServletLevel,
    descriptor::{DataSource, ReferenceKind, TrackingMode},
};

pub use components::{
    FilterConfig, FilterMappingConfig, MappingTarget, ReferenceConfig, ServletConfig,
};

/// Error page locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ErrorPages {
    /// Locations keyed by HTTP status code.
    pub by_code: IndexMap<u16, String>,
    /// Locations keyed by exception type.
    pub by_exception: IndexMap<String, String>,
    /// Location served when nothing more specific matches.
    pub default: Option<String>,
}

/// Session cookie attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CookieSettings {
    /// Cookie name.
    pub name: Option<String>,
    /// Cookie domain.
    pub domain: Option<String>,
    /// Cookie path.
    pub path: Option<String>,
    /// Cookie comment.
    pub comment: Option<String>,
    /// Whether the cookie is hidden from scripts.
    pub http_only: Option<bool>,
    /// Whether the cookie requires a secure transport.
    pub secure: Option<bool>,
    /// Cookie lifetime in seconds.
    pub max_age: Option<i32>,
}

/// Session settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionSettings {
    /// Session timeout in minutes.
    pub timeout: Option<u32>,
    /// Session cookie attributes.
    pub cookie: CookieSettings,
    /// Tracking modes.
    pub tracking_modes: Vec<TrackingMode>,
}

/// Merged configuration of one module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleConfig {
    /// Module identifier.
    pub id: String,
    /// Module name, when configured.
    pub module_name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Servlet specification level the module was merged under.
    pub servlet_level: ServletLevel,
    /// Whether the primary descriptor declared itself complete.
    pub metadata_complete: bool,
    /// Whether the module can be distributed across nodes.
    pub distributable: bool,
    /// Library fragment paths in resolved order.
    pub ordered_lib_paths: Vec<String>,
    /// Context parameters.
    pub context_params: IndexMap<String, String>,
    /// Servlets in registration order.
    pub servlets: IndexMap<String, ServletConfig>,
    /// URL patterns per servlet.
    pub servlet_mappings: IndexMap<String, Vec<String>>,
    /// Filters in registration order.
    pub filters: IndexMap<String, FilterConfig>,
    /// Filter mappings in application order.
    pub filter_mappings: Vec<FilterMappingConfig>,
    /// Listener classes in registration order.
    pub listeners: Vec<String>,
    /// Welcome files.
    pub welcome_files: Vec<String>,
    /// MIME types keyed by extension.
    pub mime_mappings: IndexMap<String, String>,
    /// Error pages.
    pub error_pages: ErrorPages,
    /// Session settings.
    pub session: SessionSettings,
    /// Character encodings keyed by locale.
    pub locale_encodings: IndexMap<String, String>,
    /// References grouped by kind, then keyed by name.
    pub references: IndexMap<ReferenceKind, IndexMap<String, ReferenceConfig>>,
    /// Data sources keyed by name.
    pub data_sources: IndexMap<String, DataSource>,
    /// Virtual host from the binding overrides.
    pub virtual_host: Option<String>,
}

impl ModuleConfig {
    /// Returns the servlet named `name`.
    #[must_use]
    pub fn servlet(&self, name: &str) -> Option<&ServletConfig> {
        self.servlets.get(name)
    }

    /// Returns the filter named `name`.
    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&FilterConfig> {
        self.filters.get(name)
    }

    /// Returns the reference of `kind` named `name`.
    #[must_use]
    pub fn reference(&self, kind: ReferenceKind, name: &str) -> Option<&ReferenceConfig> {
        self.references.get(&kind).and_then(|refs| refs.get(name))
    }

    /// Filter mappings belonging to `filter`, in application order.
    pub fn mappings_for<'a>(
        &'a self,
        filter: &'a str,
    ) -> impl Iterator<Item = &'a FilterMappingConfig> + 'a {
        self.filter_mappings.iter().filter(move |m| m.filter == filter)
    }

    pub(crate) fn servlet_mut(&mut self, name: &str) -> Option<&mut ServletConfig> {
        self.servlets.get_mut(name)
    }

    pub(crate) fn filter_mut(&mut self, name: &str) -> Option<&mut FilterConfig> {
        self.filters.get_mut(name)
    }

    pub(crate) fn reference_mut(
        &mut self,
        kind: ReferenceKind,
        name: &str,
    ) -> Option<&mut ReferenceConfig> {
        self.references.get_mut(&kind).and_then(|refs| refs.get_mut(name))
    }
}
