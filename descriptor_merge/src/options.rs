//! Options controlling a merge, layered with figment.
//!
//! Options are gathered from, in increasing precedence: built-in defaults, an
//! optional TOML file, and environment variables prefixed with
//! [`ENV_PREFIX`]. Nested keys in environment variables are separated with a
//! double underscore.

use std::fmt;

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::{MergeResult, MergeResultExt, discovery::DEFAULT_LISTENER_CAPABILITIES};

/// Prefix of environment variables read by [`MergeOptions::load`].
pub const ENV_PREFIX: &str = "DESCRIPTOR_MERGE_";

/// Servlet specification level governing version-dependent merge rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ServletLevel {
    /// Level 3.0.
    V30,
    /// Level 3.1.
    #[default]
    V31,
    /// Level 4.0.
    V40,
}

impl ServletLevel {
    /// Returns `true` when a URL pattern may be owned by only one servlet.
    #[must_use]
    pub fn enforces_unique_url_patterns(self) -> bool {
        self >= Self::V31
    }

    /// Returns `true` when fragment injection targets always merge with the
    /// primary declaration.
    #[must_use]
    pub fn merges_all_injection_targets(self) -> bool {
        self >= Self::V31
    }

    /// Returns `true` when an error page without code or exception type is
    /// accepted without an explicit opt-in.
    #[must_use]
    pub fn supports_default_error_page(self) -> bool {
        self >= Self::V31
    }
}

impl TryFrom<u16> for ServletLevel {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(Self::V30),
            31 => Ok(Self::V31),
            40 => Ok(Self::V40),
            other => Err(format!(
                "unsupported servlet level {other}; expected 30, 31, or 40"
            )),
        }
    }
}

impl From<ServletLevel> for u16 {
    fn from(level: ServletLevel) -> Self {
        match level {
            ServletLevel::V30 => 30,
            ServletLevel::V31 => 31,
            ServletLevel::V40 => 40,
        }
    }
}

impl fmt::Display for ServletLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor) = match self {
            Self::V30 => (3, 0),
            Self::V31 => (3, 1),
            Self::V40 => (4, 0),
        };
        write!(f, "{major}.{minor}")
    }
}

/// Options for one merge.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Specification level for version-dependent rules.
    pub servlet_level: ServletLevel,
    /// Accept an error page without code or exception type below level 3.1.
    pub allow_default_error_page: bool,
    /// Ignore distributable declarations entirely.
    pub ignore_distributable: bool,
    /// Queue filter mappings that name a filter not yet declared and retry
    /// them once every descriptor has been merged.
    pub defer_forward_filter_mappings: bool,
    /// Capabilities that qualify a class as a listener.
    pub listener_capabilities: Vec<String>,
    /// Module name recorded in the output and used as the default display name.
    pub module_name: Option<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            servlet_level: ServletLevel::default(),
            allow_default_error_page: false,
            ignore_distributable: false,
            defer_forward_filter_mappings: true,
            listener_capabilities: DEFAULT_LISTENER_CAPABILITIES
                .iter()
                .map(|c| (*c).to_owned())
                .collect(),
            module_name: None,
        }
    }
}

impl MergeOptions {
    /// Build the layered figment for merge options.
    ///
    /// A missing `file` contributes nothing.
    #[must_use]
    pub fn figment(file: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load options from defaults, `file`, and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::Options`] when a provider yields a value of
    /// the wrong type, such as an unsupported servlet level.
    ///
    /// # Examples
    ///
    /// ```
    /// use descriptor_merge::{MergeOptions, ServletLevel};
    /// let options = MergeOptions::load(None)?;
    /// assert_eq!(options.servlet_level, ServletLevel::V31);
    /// assert!(options.defer_forward_filter_mappings);
    /// # Ok::<_, std::sync::Arc<descriptor_merge::MergeError>>(())
    /// ```
    pub fn load(file: Option<&Utf8Path>) -> MergeResult<Self> {
        Self::extract(&Self::figment(file))
    }

    /// Extract options from an already assembled `figment`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::Options`] when extraction fails.
    pub fn extract(figment: &Figment) -> MergeResult<Self> {
        figment.extract::<Self>().into_merge()
    }

    /// Returns `true` when `class` has at least one listener capability.
    pub(crate) fn is_listener(
        &self,
        capabilities: &dyn crate::CapabilityCheck,
        class: &str,
    ) -> bool {
        self.listener_capabilities
            .iter()
            .any(|capability| capabilities.has_capability(class, capability))
    }
}
