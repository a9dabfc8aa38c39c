//! Published result of a successful merge.

use serde::Serialize;

use crate::{MergeResult, MergeResultExt, ModuleConfig, validate::Diagnostic};

/// A merged module configuration and the diagnostics found producing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergedModule {
    config: ModuleConfig,
    diagnostics: Vec<Diagnostic>,
}

impl MergedModule {
    pub(super) const fn new(config: ModuleConfig, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    /// The merged configuration.
    #[must_use]
    pub const fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Primary-over-fragment overrides, in the order they were found.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the result, returning the configuration and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (ModuleConfig, Vec<Diagnostic>) {
        (self.config, self.diagnostics)
    }

    /// Serialize the result as JSON.
    ///
    /// Maps are ordered by insertion, so equal inputs produce identical
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::Serialization`] if serialization fails.
    pub fn to_json(&self, pretty: bool) -> MergeResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.into_merge()
    }
}
