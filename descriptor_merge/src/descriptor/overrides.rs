//! Binding and extension override descriptors.

use serde::{Deserialize, Serialize};

use super::{ParamValue, ReferenceKind};

/// Binds a declared reference to a concrete resource name.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReferenceBinding {
    /// Kind of the bound reference.
    pub kind: ReferenceKind,
    /// Declared reference name.
    pub name: String,
    /// Resource name the reference resolves to.
    pub binding_name: String,
}

/// Deployment-time bindings applied after the merge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BindingDescriptor {
    /// Virtual host serving the module.
    pub virtual_host: Option<String>,
    /// Reference bindings.
    pub reference_bindings: Vec<ReferenceBinding>,
    /// Replacement values for environment entries.
    pub env_entry_values: Vec<ParamValue>,
}

/// Connection tuning for a resource reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResourceRefExtension {
    /// Resource reference name.
    pub name: String,
    /// Transaction isolation level.
    pub isolation_level: Option<String>,
    /// Connection sharing scope.
    pub sharing_scope: Option<String>,
    /// Commit priority.
    pub commit_priority: Option<i32>,
    /// Branch coupling.
    pub branch_coupling: Option<String>,
}

/// Deployment-time extensions applied after bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtensionDescriptor {
    /// Resource reference extensions.
    pub resource_refs: Vec<ResourceRefExtension>,
}
