//! Output writers for `merge-descriptors`.

use std::io::Write;

use camino::Utf8Path;
use descriptor_merge::MergedModule;

use crate::{error::CliError, fs_helpers};

/// Write `merged` as JSON to `out`, or to `stdout` when no path is given.
///
/// # Errors
///
/// Returns [`CliError::Merge`] when serialization fails or [`CliError::Io`]
/// when the output cannot be written.
pub fn write_merged(
    merged: &MergedModule,
    pretty: bool,
    out: Option<&Utf8Path>,
    stdout: &mut impl Write,
) -> Result<(), CliError> {
    let json = merged.to_json(pretty)?;
    if let Some(path) = out {
        fs_helpers::write(path, &json)?;
        tracing::info!(path = %path, "merged configuration written");
        return Ok(());
    }
    writeln!(stdout, "{json}").map_err(|source| CliError::Io {
        path: "<stdout>".into(),
        source,
    })
}
