//! Input model for the descriptors being merged.
//!
//! Descriptors are plain data. Parsing them from their on-disk XML form is
//! the caller's concern; the types here deserialize from any serde format so
//! bundles can be assembled in JSON or TOML for tooling and tests.

mod overrides;
mod references;
mod web;

use serde::{Deserialize, Serialize};

pub use overrides::{BindingDescriptor, ExtensionDescriptor, ReferenceBinding, ResourceRefExtension};
pub use references::{DataSource, InjectionTarget, Reference, ReferenceKind};
pub use web::{
    CookieConfig, Dispatcher, ErrorPage, Filter, FilterMapping, LocaleEncoding, MimeMapping,
    MultipartConfig, ParamValue, Servlet, ServletMapping, SessionConfig, TrackingMode,
};

/// Contents of a primary or fragment deployment descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ModuleDescriptor {
    /// Module display name. Only read from the primary descriptor.
    pub display_name: Option<String>,
    /// Module description. Only read from the primary descriptor.
    pub description: Option<String>,
    /// Whether the descriptor marks the module as distributable.
    pub distributable: bool,
    /// Context initialization parameters.
    pub context_params: Vec<ParamValue>,
    /// Error page declarations.
    pub error_pages: Vec<ErrorPage>,
    /// Extension to MIME type mappings.
    pub mime_mappings: Vec<MimeMapping>,
    /// Welcome file list.
    pub welcome_files: Vec<String>,
    /// Session configuration.
    pub session_config: Option<SessionConfig>,
    /// Locale to character encoding mappings.
    pub locale_encodings: Vec<LocaleEncoding>,
    /// Servlet declarations.
    pub servlets: Vec<Servlet>,
    /// Servlet URL mappings.
    pub servlet_mappings: Vec<ServletMapping>,
    /// Filter declarations.
    pub filters: Vec<Filter>,
    /// Filter mappings, in declaration order.
    pub filter_mappings: Vec<FilterMapping>,
    /// Listener class names.
    pub listeners: Vec<String>,
    /// Environment entries and resource references.
    pub references: Vec<Reference>,
    /// Data source definitions.
    pub data_sources: Vec<DataSource>,
}

/// A library fragment: its identity, its descriptor, and its scan status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Fragment {
    /// Location of the fragment within the module, such as `WEB-INF/lib/a.jar`.
    pub identity: String,
    /// The fragment descriptor, when the fragment ships one.
    pub descriptor: Option<ModuleDescriptor>,
    /// Fragment classes must not be scanned for annotations.
    pub metadata_complete: bool,
}

impl Fragment {
    /// Fragment `identity` declaring `descriptor`.
    #[must_use]
    pub fn new(identity: impl Into<String>, descriptor: ModuleDescriptor) -> Self {
        Self {
            identity: identity.into(),
            descriptor: Some(descriptor),
            metadata_complete: false,
        }
    }

    /// Fragment `identity` without a descriptor, contributing classes only.
    #[must_use]
    pub fn classes_only(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            descriptor: None,
            metadata_complete: false,
        }
    }

    /// Returns `true` when the fragment is a library archive under `WEB-INF/lib/`.
    #[must_use]
    pub fn is_library(&self) -> bool {
        self.identity.starts_with(LIBRARY_PREFIX)
    }
}

/// Prefix shared by library fragment identities.
pub const LIBRARY_PREFIX: &str = "WEB-INF/lib/";

/// Everything needed to merge one module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ModuleInputs {
    /// The module's own descriptor.
    pub primary: ModuleDescriptor,
    /// Library fragments in their resolved order.
    pub fragments: Vec<Fragment>,
    /// Binding overrides, if any.
    pub binding: Option<BindingDescriptor>,
    /// Extension overrides, if any.
    pub extension: Option<ExtensionDescriptor>,
    /// The primary descriptor declares itself complete.
    pub metadata_complete: bool,
}

impl ModuleInputs {
    /// Inputs consisting of `primary` alone.
    #[must_use]
    pub fn new(primary: ModuleDescriptor) -> Self {
        Self {
            primary,
            ..Self::default()
        }
    }

    /// Append `fragment` to the ordered fragment list.
    #[must_use]
    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Attach binding overrides.
    #[must_use]
    pub fn with_binding(mut self, binding: BindingDescriptor) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Attach extension overrides.
    #[must_use]
    pub fn with_extension(mut self, extension: ExtensionDescriptor) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Mark the primary descriptor as complete.
    #[must_use]
    pub const fn metadata_complete(mut self, complete: bool) -> Self {
        self.metadata_complete = complete;
        self
    }
}
