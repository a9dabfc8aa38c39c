//! Terse builders for descriptor values.

use descriptor_merge::{
    ErrorPage, Filter, FilterMapping, Fragment, InjectionTarget, ModuleDescriptor, ParamValue,
    Reference, ReferenceKind, Servlet, ServletMapping, SessionConfig,
};

/// Servlet `name` implemented by `class`.
#[must_use]
pub fn servlet(name: &str, class: &str) -> Servlet {
    Servlet {
        name: name.to_owned(),
        class: Some(class.to_owned()),
        ..Servlet::default()
    }
}

/// Filter `name` implemented by `class`.
#[must_use]
pub fn filter(name: &str, class: &str) -> Filter {
    Filter {
        name: name.to_owned(),
        class: Some(class.to_owned()),
        ..Filter::default()
    }
}

/// Mapping of `patterns` onto `servlet`.
#[must_use]
pub fn servlet_mapping(servlet: &str, patterns: &[&str]) -> ServletMapping {
    ServletMapping {
        servlet: servlet.to_owned(),
        url_patterns: patterns.iter().map(|p| (*p).to_owned()).collect(),
    }
}

/// Error page for HTTP status `code`.
#[must_use]
pub fn error_page(code: u16, location: &str) -> ErrorPage {
    ErrorPage {
        location: location.to_owned(),
        error_code: Some(code),
        exception_type: None,
    }
}

/// Error page served when no code or exception type matches.
#[must_use]
pub fn default_error_page(location: &str) -> ErrorPage {
    ErrorPage {
        location: location.to_owned(),
        ..ErrorPage::default()
    }
}

/// A descriptor declaring only `pages`.
#[must_use]
pub fn with_error_pages(pages: Vec<ErrorPage>) -> ModuleDescriptor {
    ModuleDescriptor {
        error_pages: pages,
        ..ModuleDescriptor::default()
    }
}

/// Reference of `kind` named `name` injected into each `(class, field)` pair.
#[must_use]
pub fn reference(kind: ReferenceKind, name: &str, targets: &[(&str, &str)]) -> Reference {
    targets
        .iter()
        .fold(Reference::named(kind, name), |declared, (class, field)| {
            declared.with_target(InjectionTarget::new(*class, *field))
        })
}

/// A descriptor declaring only context parameters.
#[must_use]
pub fn with_context_params(params: &[(&str, &str)]) -> ModuleDescriptor {
    ModuleDescriptor {
        context_params: params
            .iter()
            .map(|(name, value)| ParamValue::new(*name, *value))
            .collect(),
        ..ModuleDescriptor::default()
    }
}

/// A descriptor declaring only a session timeout.
#[must_use]
pub fn with_session_timeout(minutes: u32) -> ModuleDescriptor {
    ModuleDescriptor {
        session_config: Some(SessionConfig {
            timeout: Some(minutes),
            ..SessionConfig::default()
        }),
        ..ModuleDescriptor::default()
    }
}

/// A descriptor declaring `filters` and their `mappings`.
#[must_use]
pub fn with_filters(filters: Vec<Filter>, mappings: Vec<FilterMapping>) -> ModuleDescriptor {
    ModuleDescriptor {
        filters,
        filter_mappings: mappings,
        ..ModuleDescriptor::default()
    }
}

/// Library fragment `jar` under `WEB-INF/lib/`.
#[must_use]
pub fn library(jar: &str, descriptor: ModuleDescriptor) -> Fragment {
    Fragment::new(format!("WEB-INF/lib/{jar}"), descriptor)
}
