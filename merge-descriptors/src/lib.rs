//! Library interface for the `merge-descriptors` command.
//!
//! The binary parses [`cli::Args`] and calls [`run`]; tests call [`run`]
//! directly with an in-memory writer.

pub mod bundle;
pub mod cli;
pub mod error;
mod fs_helpers;
pub mod output;

use std::io::Write;

use descriptor_merge::{MergeOptions, MergeResult, merge_module};
use figment::providers::Serialized;

use crate::{bundle::ModuleBundle, cli::Args, error::CliError};

/// Resolve merge options: defaults, the options file, the environment, then
/// command-line overrides.
///
/// # Errors
///
/// Returns [`descriptor_merge::MergeError::Options`] when a layer holds an
/// invalid value.
pub fn resolve_options(args: &Args) -> MergeResult<MergeOptions> {
    let figment = MergeOptions::figment(args.options.as_deref())
        .merge(Serialized::defaults(args.overrides()));
    MergeOptions::extract(&figment)
}

/// Load the bundle named by `args`, merge it, and write the result.
///
/// # Errors
///
/// Returns the first I/O or parse failure, or every merge error aggregated
/// into one.
pub fn run(args: &Args, stdout: &mut impl Write) -> Result<(), CliError> {
    let options = resolve_options(args)?;
    tracing::debug!(?options, bundle = %args.bundle, "merging module bundle");
    let ModuleBundle { inputs, discovery } = ModuleBundle::load(&args.bundle)?;
    let merged = merge_module(&inputs, &discovery, &discovery, options)?;
    for diagnostic in merged.diagnostics() {
        tracing::warn!(%diagnostic, "fragment value overridden");
    }
    output::write_merged(&merged, args.pretty, args.out.as_deref(), stdout)
}
