//! Command-line interface definitions for `merge-descriptors`.

use camino::Utf8PathBuf;
use clap::Parser;
use serde::Serialize;

/// Parsed CLI arguments for `merge-descriptors`.
#[derive(Debug, Parser)]
#[command(name = "merge-descriptors")]
#[command(about = "Merge a module's descriptors into one validated configuration")]
#[command(version)]
pub struct Args {
    /// JSON bundle holding the primary descriptor, fragments, overrides, and
    /// class index.
    #[arg(value_name = "bundle.json")]
    pub bundle: Utf8PathBuf,
    /// TOML file with merge options.
    #[arg(long, value_name = "path")]
    pub options: Option<Utf8PathBuf>,
    /// Servlet level (30, 31, or 40); overrides the options file and
    /// environment.
    #[arg(long, value_name = "level")]
    pub servlet_level: Option<u16>,
    /// Module name recorded in the output.
    #[arg(long, value_name = "name")]
    pub module_name: Option<String>,
    /// Write the merged configuration here instead of standard output.
    #[arg(long, value_name = "path")]
    pub out: Option<Utf8PathBuf>,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Option values given on the command line, layered over every other source.
#[derive(Debug, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    servlet_level: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    module_name: Option<String>,
}

impl Args {
    /// Option overrides carried by these arguments.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            servlet_level: self.servlet_level,
            module_name: self.module_name.clone(),
        }
    }
}
