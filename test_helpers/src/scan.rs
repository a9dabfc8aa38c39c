//! Discovery fakes for merge tests.

use std::fmt;

use descriptor_merge::{
    Annotation, CapabilityCheck, Discovery, DiscoveryError, Marker, ScanScope, ScannedClass,
    WebFilterInfo, WebServletInfo,
    discovery::{DEFAULT_LISTENER_CAPABILITIES, FILTER, HTTP_SERVLET},
};
use indexmap::IndexSet;

fn patterns(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|p| (*p).to_owned()).collect()
}

/// A seed servlet class in `fragment` marked with URL `url_patterns`.
#[must_use]
pub fn annotated_servlet(fragment: &str, name: Option<&str>, url_patterns: &[&str]) -> ScannedClass {
    ScannedClass::seed(fragment)
        .with_capability(HTTP_SERVLET)
        .with_annotation(Annotation::WebServlet(WebServletInfo {
            name: name.map(str::to_owned),
            url_patterns: patterns(url_patterns),
            ..WebServletInfo::default()
        }))
}

/// A seed filter class in `fragment` marked with URL `url_patterns`.
#[must_use]
pub fn annotated_filter(fragment: &str, name: Option<&str>, url_patterns: &[&str]) -> ScannedClass {
    ScannedClass::seed(fragment)
        .with_capability(FILTER)
        .with_annotation(Annotation::WebFilter(WebFilterInfo {
            name: name.map(str::to_owned),
            url_patterns: patterns(url_patterns),
            ..WebFilterInfo::default()
        }))
}

/// A seed listener class in `fragment`.
#[must_use]
pub fn annotated_listener(fragment: &str) -> ScannedClass {
    DEFAULT_LISTENER_CAPABILITIES
        .iter()
        .take(1)
        .fold(ScannedClass::seed(fragment), |class, capability| {
            class.with_capability(*capability)
        })
        .with_annotation(Annotation::WebListener)
}

/// Error returned by [`FailingDiscovery`].
#[derive(Debug)]
pub struct IndexUnavailable;

impl fmt::Display for IndexUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("class index unavailable")
    }
}

impl std::error::Error for IndexUnavailable {}

/// Discovery whose queries always fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingDiscovery;

impl Discovery for FailingDiscovery {
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
        Err(Box::new(IndexUnavailable))
    }

    fn annotation(&self, _class: &str, _marker: Marker) -> Result<Option<Annotation>, DiscoveryError> {
        Err(Box::new(IndexUnavailable))
    }
}

impl CapabilityCheck for FailingDiscovery {
    fn has_capability(&self, _class: &str, _capability: &str) -> bool {
        true
    }
}
