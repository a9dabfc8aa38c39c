//! Merged component and reference entries.

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::{
    Dispatcher, InjectionTarget, MultipartConfig, Reference, ResourceRefExtension,
};

/// A merged servlet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServletConfig {
    /// Declared or generated identifier.
    pub id: String,
    /// Servlet name.
    pub name: String,
    /// Implementing class.
    pub class: Option<String>,
    /// JSP file served instead of a class.
    pub jsp_file: Option<String>,
    /// Whether the servlet is enabled.
    pub enabled: Option<bool>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initialization parameters.
    pub init_params: IndexMap<String, String>,
    /// Startup ordering hint.
    pub load_on_startup: Option<i32>,
    /// Whether asynchronous processing is supported.
    pub async_supported: bool,
    /// Multipart upload limits.
    pub multipart: Option<MultipartConfig>,
    /// Run-as role.
    pub run_as_role: Option<String>,
}

impl ServletConfig {
    /// An empty servlet entry.
    #[must_use]
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            ..Self::default()
        }
    }
}

/// A merged filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Declared or generated identifier.
    pub id: String,
    /// Filter name.
    pub name: String,
    /// Implementing class.
    pub class: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initialization parameters.
    pub init_params: IndexMap<String, String>,
    /// Whether asynchronous processing is supported.
    pub async_supported: bool,
}

impl FilterConfig {
    /// An empty filter entry.
    #[must_use]
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            ..Self::default()
        }
    }
}

/// What a filter mapping applies to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingTarget {
    /// A URL pattern.
    UrlPattern(String),
    /// A servlet name.
    ServletName(String),
}

/// A merged filter mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterMappingConfig {
    /// Filter name.
    pub filter: String,
    /// Mapping target.
    pub target: MappingTarget,
    /// Dispatch kinds; empty means requests only.
    pub dispatchers: Vec<Dispatcher>,
}

/// A merged reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReferenceConfig {
    /// Reference name.
    pub name: String,
    /// Declared type.
    pub type_name: Option<String>,
    /// Lookup name.
    pub lookup: Option<String>,
    /// Inline or overridden value.
    pub value: Option<String>,
    /// Injection targets from every contributing source.
    pub injection_targets: Vec<InjectionTarget>,
    /// Resource name from the binding overrides.
    pub binding_name: Option<String>,
    /// Connection tuning from the extension overrides.
    pub extension: Option<ResourceRefExtension>,
}

impl From<&Reference> for ReferenceConfig {
    fn from(reference: &Reference) -> Self {
        Self {
            name: reference.name.clone(),
            type_name: reference.type_name.clone(),
            lookup: reference.lookup.clone(),
            value: reference.value.clone(),
            injection_targets: reference.injection_targets.clone(),
            binding_name: None,
            extension: None,
        }
    }
}

impl ReferenceConfig {
    /// Append `targets` not already present.
    pub fn merge_targets(&mut self, targets: &[InjectionTarget]) {
        for target in targets {
            if !self.injection_targets.contains(target) {
                self.injection_targets.push(target.clone());
            }
        }
    }
}
