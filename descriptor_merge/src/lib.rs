//! Descriptor merge engine for modular deployment configuration.
//!
//! A web module is described by one primary descriptor, an ordered list of
//! library fragments, and facts discovered by scanning classes. This crate
//! reconciles those sources into a single [`ModuleConfig`], applies the binding
//! and extension overrides on top, and reports every conflict found along the
//! way instead of stopping at the first.
//!
//! The precedence rule is fixed by [`SourceTier`]: primary values beat fragment
//! values, which beat discovered values. Binding and extension values are
//! applied last and simply overwrite.
//!
//! # Example
//!
//! ```rust
//! use descriptor_merge::{
//!     Fragment, MergeOptions, ModuleDescriptor, ModuleInputs, NoDiscovery, SessionConfig,
//!     merge_module,
//! };
//!
//! let primary = ModuleDescriptor {
//!     session_config: Some(SessionConfig { timeout: Some(30), ..SessionConfig::default() }),
//!     ..ModuleDescriptor::default()
//! };
//! let fragment = Fragment::new(
//!     "WEB-INF/lib/audit.jar",
//!     ModuleDescriptor {
//!         session_config: Some(SessionConfig { timeout: Some(45), ..SessionConfig::default() }),
//!         ..ModuleDescriptor::default()
//!     },
//! );
//! let inputs = ModuleInputs::new(primary).with_fragment(fragment);
//!
//! let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
//! assert_eq!(merged.config().session.timeout, Some(30));
//! assert_eq!(merged.diagnostics().len(), 1);
//! # Ok::<_, std::sync::Arc<descriptor_merge::MergeError>>(())
//! ```

pub mod config;
pub mod context;
pub mod deferred;
pub mod descriptor;
pub mod discovery;
mod error;
mod ids;
mod item;
mod options;
mod result_ext;
mod session;
mod tier;
pub mod validate;

use std::sync::Arc;

pub use config::{
    CookieSettings, ErrorPages, FilterConfig, FilterMappingConfig, MappingTarget, ModuleConfig,
    ReferenceConfig, ServletConfig, SessionSettings,
};
pub use descriptor::{
    BindingDescriptor, CookieConfig, DataSource, Dispatcher, ErrorPage, ExtensionDescriptor,
    Filter, FilterMapping, Fragment, InjectionTarget, LocaleEncoding, MimeMapping,
    ModuleDescriptor, ModuleInputs, MultipartConfig, ParamValue, Reference, ReferenceBinding,
    ReferenceKind, ResourceRefExtension, Servlet, ServletMapping, SessionConfig, TrackingMode,
};
pub use discovery::{
    Annotation, CapabilityCheck, ClassRegion, Discovery, DiscoveryError, Marker, NoDiscovery,
    ScanScope, ScannedClass, StaticDiscovery, WebFilterInfo, WebServletInfo,
};
pub use error::{AggregatedErrors, Conflict, MergeError};
pub use ids::IdGenerator;
pub use item::{Comparator, ConfigItem};
pub use options::{ENV_PREFIX, MergeOptions, ServletLevel};
pub use result_ext::{CollaboratorExt, MergeResultExt};
pub use session::{MergeSession, MergedModule, Phase, merge_module};
pub use tier::{Provenance, SourceTier};
pub use validate::Diagnostic;

/// Result type used throughout the merge engine.
///
/// Errors are shared behind an [`Arc`] so accumulated conflicts can be
/// aggregated without cloning.
pub type MergeResult<T> = Result<T, Arc<MergeError>>;
