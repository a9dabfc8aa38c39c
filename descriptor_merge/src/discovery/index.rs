//! Discovery backed by a precomputed class index.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{Annotation, CapabilityCheck, Discovery, DiscoveryError, Marker, ScanScope};

/// Where a class sits relative to the module's scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassRegion {
    /// Scanned with its fragment.
    #[default]
    Seed,
    /// In a fragment whose descriptor is complete; only resolved on demand.
    Partial,
    /// In a fragment excluded from scanning.
    Excluded,
    /// Outside the module.
    External,
}

/// What the index knows about one class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScannedClass {
    /// Identity of the fragment containing the class.
    pub fragment: Option<String>,
    /// Scan region of the class.
    pub region: ClassRegion,
    /// Capabilities of the class, such as `http-servlet`.
    pub capabilities: Vec<String>,
    /// Markers present on the class.
    pub annotations: Vec<Annotation>,
}

impl ScannedClass {
    /// A seed class in `fragment`.
    #[must_use]
    pub fn seed(fragment: impl Into<String>) -> Self {
        Self {
            fragment: Some(fragment.into()),
            ..Self::default()
        }
    }

    /// A class in `fragment` resolved only on demand.
    #[must_use]
    pub fn partial(fragment: impl Into<String>) -> Self {
        Self {
            fragment: Some(fragment.into()),
            region: ClassRegion::Partial,
            ..Self::default()
        }
    }

    /// Add a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Add a marker.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn annotation(&self, marker: Marker) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.marker() == marker)
    }
}

/// Discovery and capability answers read from an in-memory index.
///
/// Classes are reported in the order they were inserted.
///
/// # Examples
///
/// ```
/// use descriptor_merge::{Discovery, Marker, ScanScope, ScannedClass, StaticDiscovery};
/// use descriptor_merge::discovery::Annotation;
///
/// let discovery = StaticDiscovery::default().with_class(
///     "com.acme.AuditListener",
///     ScannedClass::seed("WEB-INF/lib/audit.jar").with_annotation(Annotation::WebListener),
/// );
/// let found = discovery
///     .select_annotated_classes(ScanScope::Fragment("WEB-INF/lib/audit.jar"), Marker::WebListener)?;
/// assert!(found.contains("com.acme.AuditListener"));
/// # Ok::<_, descriptor_merge::DiscoveryError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StaticDiscovery {
    classes: IndexMap<String, ScannedClass>,
}

impl StaticDiscovery {
    /// Add or replace the entry for `class`.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>, scanned: ScannedClass) -> Self {
        self.insert(class, scanned);
        self
    }

    /// Add or replace the entry for `class`.
    pub fn insert(&mut self, class: impl Into<String>, scanned: ScannedClass) {
        self.classes.insert(class.into(), scanned);
    }

    /// Number of indexed classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` when the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn region(&self, class: &str) -> Option<ClassRegion> {
        self.classes.get(class).map(|scanned| scanned.region)
    }
}

impl Discovery for StaticDiscovery {
    fn is_included_class(&self, class: &str) -> bool {
        self.region(class) == Some(ClassRegion::Seed)
    }

    fn is_excluded_class(&self, class: &str) -> bool {
        self.region(class) == Some(ClassRegion::Excluded)
    }

    fn is_external_class(&self, class: &str) -> bool {
        self.region(class) == Some(ClassRegion::External)
    }

    fn select_annotated_classes(
        &self,
        scope: ScanScope<'_>,
        marker: Marker,
    ) -> Result<IndexSet<String>, DiscoveryError> {
        let selected = self.classes.iter().filter(|(name, scanned)| {
            let in_scope = match scope {
                ScanScope::Fragment(identity) => {
                    scanned.region == ClassRegion::Seed
                        && scanned.fragment.as_deref() == Some(identity)
                }
                ScanScope::Classes(classes) => classes.contains(name.as_str()),
            };
            in_scope && scanned.annotation(marker).is_some()
        });
        Ok(selected.map(|(name, _)| name.clone()).collect())
    }

    fn annotation(&self, class: &str, marker: Marker) -> Result<Option<Annotation>, DiscoveryError> {
        Ok(self
            .classes
            .get(class)
            .and_then(|scanned| scanned.annotation(marker))
            .cloned())
    }
}

impl CapabilityCheck for StaticDiscovery {
    fn has_capability(&self, class: &str, capability: &str) -> bool {
        self.classes
            .get(class)
            .is_some_and(|scanned| scanned.capabilities.iter().any(|c| c == capability))
    }
}
