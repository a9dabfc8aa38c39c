//! Annotation payloads returned by discovery.

use serde::{Deserialize, Serialize};

use super::Marker;
use crate::descriptor::{Dispatcher, MultipartConfig, ParamValue};

/// Attributes of a servlet marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WebServletInfo {
    /// Servlet name; the class name is used when empty.
    pub name: Option<String>,
    /// URL patterns given positionally.
    pub value: Vec<String>,
    /// URL patterns given by name.
    pub url_patterns: Vec<String>,
    /// Startup ordering hint.
    pub load_on_startup: Option<i32>,
    /// Whether the servlet supports asynchronous processing.
    pub async_supported: Option<bool>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initialization parameters.
    pub init_params: Vec<ParamValue>,
}

/// Attributes of a filter marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WebFilterInfo {
    /// Filter name; the class name is used when empty.
    pub name: Option<String>,
    /// URL patterns given positionally.
    pub value: Vec<String>,
    /// URL patterns given by name.
    pub url_patterns: Vec<String>,
    /// Servlets the filter applies to.
    pub servlet_names: Vec<String>,
    /// Dispatch kinds.
    pub dispatchers: Vec<Dispatcher>,
    /// Whether the filter supports asynchronous processing.
    pub async_supported: Option<bool>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initialization parameters.
    pub init_params: Vec<ParamValue>,
}

/// A marker found on a class, with its attributes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "marker", rename_all = "kebab-case")]
pub enum Annotation {
    /// Servlet declaration.
    WebServlet(WebServletInfo),
    /// Filter declaration.
    WebFilter(WebFilterInfo),
    /// Listener declaration.
    WebListener,
    /// Multipart upload limits.
    MultipartConfig(MultipartConfig),
    /// Run-as role.
    RunAs {
        /// Role name.
        role: String,
    },
}

impl Annotation {
    /// Marker kind of the annotation.
    #[must_use]
    pub const fn marker(&self) -> Marker {
        match self {
            Self::WebServlet(_) => Marker::WebServlet,
            Self::WebFilter(_) => Marker::WebFilter,
            Self::WebListener => Marker::WebListener,
            Self::MultipartConfig(_) => Marker::MultipartConfig,
            Self::RunAs { .. } => Marker::RunAs,
        }
    }
}
