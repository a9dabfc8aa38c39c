//! The JSON bundle describing one module.

use camino::Utf8Path;
use descriptor_merge::{ModuleInputs, StaticDiscovery};
use serde::Deserialize;

use crate::{error::CliError, fs_helpers};

/// Merge inputs for one module together with its class index.
///
/// ```json
/// {
///   "primary": { "display-name": "shop" },
///   "fragments": [{ "identity": "WEB-INF/lib/audit.jar", "descriptor": {} }],
///   "metadata-complete": false,
///   "discovery": { "com.acme.Audit": { "fragment": "WEB-INF/lib/audit.jar" } }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModuleBundle {
    /// Primary descriptor, fragments, and overrides.
    #[serde(flatten)]
    pub inputs: ModuleInputs,
    /// Class index answering discovery and capability queries.
    pub discovery: StaticDiscovery,
}

impl ModuleBundle {
    /// Read and parse the bundle at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] when the file cannot be read or
    /// [`CliError::Bundle`] when it does not parse.
    pub fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let raw = fs_helpers::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| CliError::Bundle {
            path: path.to_path_buf(),
            source,
        })
    }
}
