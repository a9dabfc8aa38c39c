//! Context keys used by the merge session.

use super::{ItemKey, NameKey};
use crate::descriptor::{DataSource, FilterMapping, MultipartConfig, ResourceRefExtension};

/// Declared servlets, recording their class.
pub const SERVLET: ItemKey<String> = ItemKey::new("servlet");
/// Declared filters, recording their class.
pub const FILTER: ItemKey<String> = ItemKey::new("filter");
/// Servlets with descriptor URL mappings, recording the first pattern list.
pub const SERVLET_MAPPING: ItemKey<Vec<String>> = ItemKey::new("servlet-mapping");
/// Filters with descriptor mappings, recording the first mapping.
pub const FILTER_MAPPING: ItemKey<FilterMapping> = ItemKey::new("filter-mapping");
/// URL patterns, recording the servlet that owns each.
pub const URL_PATTERN_OWNER: ItemKey<String> = ItemKey::new("url-pattern");

/// Servlet startup ordering, keyed by servlet name.
pub const LOAD_ON_STARTUP: ItemKey<i32> = ItemKey::new("servlet.load-on-startup");
/// Servlet async support, keyed by servlet name.
pub const SERVLET_ASYNC: ItemKey<bool> = ItemKey::new("servlet.async-supported");
/// Filter async support, keyed by filter name.
pub const FILTER_ASYNC: ItemKey<bool> = ItemKey::new("filter.async-supported");
/// Servlet init parameters, keyed by `servlet.param`.
pub const SERVLET_INIT_PARAM: ItemKey<String> = ItemKey::new("servlet.init-param");
/// Filter init parameters, keyed by `filter.param`.
pub const FILTER_INIT_PARAM: ItemKey<String> = ItemKey::new("filter.init-param");
/// Servlet multipart limits, keyed by servlet name.
pub const MULTIPART: ItemKey<MultipartConfig> = ItemKey::new("servlet.multipart-config");
/// Servlet run-as roles, keyed by servlet name.
pub const RUN_AS: ItemKey<String> = ItemKey::new("servlet.run-as");

/// Context parameters, keyed by name.
pub const CONTEXT_PARAM: ItemKey<String> = ItemKey::new("context-param");
/// MIME types, keyed by extension.
pub const MIME_MAPPING: ItemKey<String> = ItemKey::new("mime-mapping");
/// Error page locations, keyed by status code.
pub const ERROR_PAGE_CODE: ItemKey<String> = ItemKey::new("error-page.error-code");
/// Error page locations, keyed by exception type.
pub const ERROR_PAGE_EXCEPTION: ItemKey<String> = ItemKey::new("error-page.exception-type");
/// The default error page location.
pub const ERROR_PAGE_DEFAULT: ItemKey<String> = ItemKey::new("error-page.default");
/// Session settings rendered as text, keyed by element name.
pub const SESSION_SETTING: ItemKey<String> = ItemKey::new("session-config");
/// Character encodings, keyed by locale.
pub const LOCALE_ENCODING: ItemKey<String> = ItemKey::new("locale-encoding");
/// Data source definitions, keyed by name.
pub const DATA_SOURCE: ItemKey<DataSource> = ItemKey::new("data-source");

/// Registered listener classes.
pub const LISTENER: NameKey = NameKey::new("listener");
/// Registered welcome files.
pub const WELCOME_FILE: NameKey = NameKey::new("welcome-file");
/// Registered session tracking modes.
pub const TRACKING_MODE: NameKey = NameKey::new("tracking-mode");

/// Binding values, keyed by `kind:name` or by setting.
pub const BINDING: ItemKey<String> = ItemKey::new("binding");
/// Resource reference extensions, keyed by reference name.
pub const EXTENSION: ItemKey<ResourceRefExtension> = ItemKey::new("extension");
