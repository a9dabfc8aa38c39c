//! Environment entries, resource references, and data sources.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::{ItemKey, NameKey};

/// Kind of named reference a component can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// Environment entry.
    EnvEntry,
    /// Enterprise bean reference.
    EjbRef,
    /// Local enterprise bean reference.
    EjbLocalRef,
    /// Resource manager connection factory reference.
    ResourceRef,
    /// Resource environment reference.
    ResourceEnvRef,
    /// Message destination reference.
    MessageDestinationRef,
    /// Persistence context reference.
    PersistenceContextRef,
    /// Persistence unit reference.
    PersistenceUnitRef,
    /// Web service reference.
    ServiceRef,
}

impl ReferenceKind {
    /// Every reference kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::EnvEntry,
        Self::EjbRef,
        Self::EjbLocalRef,
        Self::ResourceRef,
        Self::ResourceEnvRef,
        Self::MessageDestinationRef,
        Self::PersistenceContextRef,
        Self::PersistenceUnitRef,
        Self::ServiceRef,
    ];

    /// Descriptor element name for the kind.
    #[must_use]
    pub const fn element(self) -> &'static str {
        match self {
            Self::EnvEntry => "env-entry",
            Self::EjbRef => "ejb-ref",
            Self::EjbLocalRef => "ejb-local-ref",
            Self::ResourceRef => "resource-ref",
            Self::ResourceEnvRef => "resource-env-ref",
            Self::MessageDestinationRef => "message-destination-ref",
            Self::PersistenceContextRef => "persistence-context-ref",
            Self::PersistenceUnitRef => "persistence-unit-ref",
            Self::ServiceRef => "service-ref",
        }
    }

    /// Child element holding the reference name.
    #[must_use]
    pub const fn name_element(self) -> &'static str {
        match self {
            Self::EnvEntry => "env-entry-name",
            Self::EjbRef | Self::EjbLocalRef => "ejb-ref-name",
            Self::ResourceRef => "res-ref-name",
            Self::ResourceEnvRef => "resource-env-ref-name",
            Self::MessageDestinationRef => "message-destination-ref-name",
            Self::PersistenceContextRef => "persistence-context-ref-name",
            Self::PersistenceUnitRef => "persistence-unit-ref-name",
            Self::ServiceRef => "service-ref-name",
        }
    }

    /// Context key recording declarations of this kind.
    #[must_use]
    pub const fn item_key(self) -> ItemKey<Reference> {
        ItemKey::new(self.element())
    }

    /// Context key recording names whose injection targets are additive.
    #[must_use]
    pub const fn additive_key(self) -> NameKey {
        NameKey::new(match self {
            Self::EnvEntry => "additive:env-entry",
            Self::EjbRef => "additive:ejb-ref",
            Self::EjbLocalRef => "additive:ejb-local-ref",
            Self::ResourceRef => "additive:resource-ref",
            Self::ResourceEnvRef => "additive:resource-env-ref",
            Self::MessageDestinationRef => "additive:message-destination-ref",
            Self::PersistenceContextRef => "additive:persistence-context-ref",
            Self::PersistenceUnitRef => "additive:persistence-unit-ref",
            Self::ServiceRef => "additive:service-ref",
        })
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element())
    }
}

/// A field or property that receives an injected reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InjectionTarget {
    /// Class declaring the target.
    pub class: String,
    /// Field or property name.
    pub name: String,
}

impl InjectionTarget {
    /// Target `name` on `class`.
    #[must_use]
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
        }
    }
}

/// A named reference declaration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Reference {
    /// Kind of reference.
    pub kind: ReferenceKind,
    /// Reference name, unique per kind.
    pub name: String,
    /// Declared type.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Lookup name.
    #[serde(default)]
    pub lookup: Option<String>,
    /// Inline value, for environment entries.
    #[serde(default)]
    pub value: Option<String>,
    /// Injection targets.
    #[serde(default)]
    pub injection_targets: Vec<InjectionTarget>,
}

impl Reference {
    /// An environment entry `name` holding `value`.
    #[must_use]
    pub fn env_entry(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::EnvEntry,
            name: name.into(),
            type_name: Some("java.lang.String".to_owned()),
            lookup: None,
            value: Some(value.into()),
            injection_targets: Vec::new(),
        }
    }

    /// A reference of `kind` named `name` with no further attributes.
    #[must_use]
    pub fn named(kind: ReferenceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name: None,
            lookup: None,
            value: None,
            injection_targets: Vec::new(),
        }
    }

    /// Add an injection target.
    #[must_use]
    pub fn with_target(mut self, target: InjectionTarget) -> Self {
        self.injection_targets.push(target);
        self
    }

    /// Compare two declarations ignoring their injection targets, which are
    /// merged rather than compared.
    #[must_use]
    pub fn same_declaration(lhs: &Self, rhs: &Self) -> bool {
        lhs.kind == rhs.kind
            && lhs.name == rhs.name
            && lhs.type_name == rhs.type_name
            && lhs.lookup == rhs.lookup
            && lhs.value == rhs.value
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(type_name) = &self.type_name {
            write!(f, " type={type_name}")?;
        }
        if let Some(lookup) = &self.lookup {
            write!(f, " lookup={lookup}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " value={value}")?;
        }
        Ok(())
    }
}

/// A data source definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DataSource {
    /// Data source name.
    pub name: String,
    /// Driver class.
    pub class_name: Option<String>,
    /// Connection URL.
    pub url: Option<String>,
    /// Database user.
    pub user: Option<String>,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} class={} url={}",
            self.name,
            self.class_name.as_deref().unwrap_or("-"),
            self.url.as_deref().unwrap_or("-"),
        )
    }
}
