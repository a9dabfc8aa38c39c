//! Component, mapping, and settings declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A name/value pair used for context and init parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamValue {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl ParamValue {
    /// Parameter `name` with `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Upload limits for a servlet accepting multipart requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MultipartConfig {
    /// Directory for temporary files.
    pub location: Option<String>,
    /// Largest accepted file, in bytes.
    pub max_file_size: Option<i64>,
    /// Largest accepted request, in bytes.
    pub max_request_size: Option<i64>,
    /// Size above which parts are written to disk.
    pub file_size_threshold: Option<i32>,
}

impl fmt::Display for MultipartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "location={}, max-file-size={}, max-request-size={}, file-size-threshold={}",
            self.location.as_deref().unwrap_or(""),
            self.max_file_size.unwrap_or(-1),
            self.max_request_size.unwrap_or(-1),
            self.file_size_threshold.unwrap_or(0),
        )
    }
}

/// A servlet declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Servlet {
    /// Explicit identifier; one is generated when absent.
    pub id: Option<String>,
    /// Servlet name, unique within the module.
    pub name: String,
    /// Implementing class.
    pub class: Option<String>,
    /// JSP file served by this servlet instead of a class.
    pub jsp_file: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initialization parameters.
    pub init_params: Vec<ParamValue>,
    /// Startup ordering hint.
    pub load_on_startup: Option<i32>,
    /// Whether the servlet supports asynchronous processing.
    pub async_supported: Option<bool>,
    /// Multipart upload limits.
    pub multipart: Option<MultipartConfig>,
    /// Security role the servlet runs as.
    pub run_as: Option<String>,
    /// Whether the servlet is enabled.
    pub enabled: Option<bool>,
}

/// A filter declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Filter {
    /// Explicit identifier; one is generated when absent.
    pub id: Option<String>,
    /// Filter name, unique within the module.
    pub name: String,
    /// Implementing class.
    pub class: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initialization parameters.
    pub init_params: Vec<ParamValue>,
    /// Whether the filter supports asynchronous processing.
    pub async_supported: Option<bool>,
}

/// URL patterns mapped to one servlet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServletMapping {
    /// Servlet name.
    pub servlet: String,
    /// URL patterns routed to the servlet.
    pub url_patterns: Vec<String>,
}

/// Request dispatch kinds a filter mapping applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dispatcher {
    /// Direct client requests.
    Request,
    /// Forwarded requests.
    Forward,
    /// Included requests.
    Include,
    /// Error page dispatches.
    Error,
    /// Asynchronous dispatches.
    Async,
}

/// A filter mapping targeting either a URL pattern or a servlet name.
///
/// The servlet name `*` targets every servlet in the module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterMapping {
    /// Filter name.
    pub filter: String,
    /// URL pattern the filter applies to.
    pub url_pattern: Option<String>,
    /// Servlet the filter applies to.
    pub servlet_name: Option<String>,
    /// Dispatch kinds; empty means requests only.
    pub dispatchers: Vec<Dispatcher>,
}

impl FilterMapping {
    /// Map `filter` onto `pattern`.
    #[must_use]
    pub fn url(filter: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            url_pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Map `filter` onto the servlet named `servlet`.
    #[must_use]
    pub fn servlet(filter: impl Into<String>, servlet: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            servlet_name: Some(servlet.into()),
            ..Self::default()
        }
    }
}

/// An error page keyed by status code, exception type, or neither.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ErrorPage {
    /// Page served for the error.
    pub location: String,
    /// HTTP status code handled by the page.
    pub error_code: Option<u16>,
    /// Exception type handled by the page.
    pub exception_type: Option<String>,
}

/// Extension to MIME type mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MimeMapping {
    /// File extension without the leading dot.
    pub extension: String,
    /// MIME type served for the extension.
    pub mime_type: String,
}

/// Locale to character encoding mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocaleEncoding {
    /// Locale tag.
    pub locale: String,
    /// Character encoding.
    pub encoding: String,
}

/// How session identifiers are tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingMode {
    /// Session cookie.
    Cookie,
    /// URL rewriting.
    Url,
    /// SSL session.
    Ssl,
}

impl TrackingMode {
    /// Upper-case name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "COOKIE",
            Self::Url => "URL",
            Self::Ssl => "SSL",
        }
    }
}

/// Session cookie attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CookieConfig {
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

/// Session configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SessionConfig {
    /// Session timeout in minutes.
    pub timeout: Option<u32>,
    /// Session cookie attributes.
    pub cookie: Option<CookieConfig>,
    /// Tracking modes.
    pub tracking_modes: Vec<TrackingMode>,
}
