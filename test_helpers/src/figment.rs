//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail gives each test its own working directory and environment, so
//! option files and `DESCRIPTOR_MERGE_*` variables never leak between tests.

use anyhow::{Result, anyhow};
use camino::Utf8Path;
use descriptor_merge::{ENV_PREFIX, MergeOptions};

/// Name of the options file written by [`load_options`].
pub const OPTIONS_FILE: &str = "merge.toml";

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down once the closure completes, even when the closure
/// returns an error.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Load [`MergeOptions`] inside a jail.
///
/// `file` is written to [`OPTIONS_FILE`] when given. Each `(name, value)`
/// pair in `env` is exported with the [`ENV_PREFIX`] prepended.
///
/// # Errors
///
/// Returns an error if the jail cannot be prepared or the options fail to
/// load.
pub fn load_options(file: Option<&str>, env: &[(&str, &str)]) -> Result<MergeOptions> {
    with_jail(|jail| {
        if let Some(contents) = file {
            jail.create_file(OPTIONS_FILE, contents)?;
        }
        for (name, value) in env {
            jail.set_env(format!("{ENV_PREFIX}{name}"), value);
        }
        let path = file.map(|_| Utf8Path::new(OPTIONS_FILE));
        MergeOptions::load(path).map_err(figment_error)
    })
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a map_err adaptor, which hands over ownership"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
