//! Integration tests for the `merge-descriptors` command.

use std::process::Command;

use anyhow::{Context, Result, anyhow, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use merge_descriptors::{cli::Args, error::CliError, resolve_options, run};
use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

const PRIMARY_WINS: &str = r#"{
  "primary": { "display-name": "shop", "session-config": { "timeout": 30 } },
  "fragments": [
    { "identity": "WEB-INF/lib/audit.jar", "descriptor": { "session-config": { "timeout": 45 } } }
  ]
}"#;

const FRAGMENTS_DISAGREE: &str = r#"{
  "fragments": [
    { "identity": "WEB-INF/lib/a.jar", "descriptor": { "session-config": { "timeout": 10 } } },
    { "identity": "WEB-INF/lib/b.jar", "descriptor": { "session-config": { "timeout": 20 } } }
  ]
}"#;

const DISCOVERED_SERVLET: &str = r#"{
  "discovery": {
    "com.acme.Hello": {
      "fragment": "WEB-INF/classes",
      "capabilities": ["http-servlet"],
      "annotations": [{ "marker": "web-servlet", "name": "hello", "url-patterns": ["/hello"] }]
    }
  },
  "fragments": [{ "identity": "WEB-INF/classes" }]
}"#;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn file(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(name);
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let root = Utf8Path::from_path(dir.path())
        .unwrap_or_else(|| panic!("temporary directory is not UTF-8"))
        .to_path_buf();
    Workspace { _dir: dir, root }
}

fn args(extra: &[&str]) -> Result<Args> {
    let argv = std::iter::once("merge-descriptors").chain(extra.iter().copied());
    Ok(Args::try_parse_from(argv)?)
}

fn merged_json(args: &Args) -> Result<Value> {
    let mut stdout = Vec::new();
    run(args, &mut stdout)?;
    Ok(serde_json::from_slice(&stdout)?)
}

#[rstest]
fn primary_values_are_written_to_stdout(workspace: Workspace) -> Result<()> {
    let bundle = workspace.file("bundle.json", PRIMARY_WINS)?;
    let json = merged_json(&args(&[bundle.as_str()])?)?;
    ensure!(json["config"]["session"]["timeout"] == 30);
    ensure!(json["config"]["display-name"] == "shop");
    let diagnostics = json["diagnostics"]
        .as_array()
        .ok_or_else(|| anyhow!("diagnostics should be an array"))?;
    ensure!(diagnostics.len() == 1, "expected one override, got {diagnostics:?}");
    Ok(())
}

#[rstest]
fn output_file_receives_pretty_json(workspace: Workspace) -> Result<()> {
    let bundle = workspace.file("bundle.json", PRIMARY_WINS)?;
    let out = workspace.root.join("merged.json");
    let mut stdout = Vec::new();
    run(&args(&[bundle.as_str(), "--out", out.as_str(), "--pretty"])?, &mut stdout)?;
    ensure!(stdout.is_empty(), "nothing should reach stdout");
    let written = std::fs::read_to_string(&out)?;
    ensure!(written.contains("\n  \"config\""), "output not pretty: {written}");
    Ok(())
}

#[rstest]
fn conflicting_fragments_fail_the_merge(workspace: Workspace) -> Result<()> {
    let bundle = workspace.file("bundle.json", FRAGMENTS_DISAGREE)?;
    let mut stdout = Vec::new();
    let err = run(&args(&[bundle.as_str()])?, &mut stdout)
        .err()
        .ok_or_else(|| anyhow!("conflicting fragments should fail"))?;
    ensure!(matches!(err, CliError::Merge(_)), "unexpected error: {err}");
    ensure!(stdout.is_empty(), "a failed merge publishes nothing");
    Ok(())
}

#[rstest]
fn discovered_servlets_are_mapped(workspace: Workspace) -> Result<()> {
    let bundle = workspace.file("bundle.json", DISCOVERED_SERVLET)?;
    let json = merged_json(&args(&[bundle.as_str()])?)?;
    ensure!(json["config"]["servlets"]["hello"]["class"] == "com.acme.Hello");
    ensure!(json["config"]["servlet-mappings"]["hello"][0] == "/hello");
    Ok(())
}

#[rstest]
fn malformed_bundle_is_reported(workspace: Workspace) -> Result<()> {
    let bundle = workspace.file("bundle.json", "{ not json")?;
    let err = run(&args(&[bundle.as_str()])?, &mut Vec::new())
        .err()
        .ok_or_else(|| anyhow!("malformed bundle should fail"))?;
    ensure!(matches!(err, CliError::Bundle { .. }), "unexpected error: {err}");
    Ok(())
}

#[rstest]
fn missing_bundle_is_an_io_error(workspace: Workspace) -> Result<()> {
    let bundle = workspace.root.join("absent.json");
    let err = run(&args(&[bundle.as_str()])?, &mut Vec::new())
        .err()
        .ok_or_else(|| anyhow!("missing bundle should fail"))?;
    ensure!(matches!(err, CliError::Io { .. }), "unexpected error: {err}");
    Ok(())
}

#[rstest]
fn command_line_overrides_the_options_file(workspace: Workspace) -> Result<()> {
    let options = workspace.file(
        "merge.toml",
        "servlet_level = 30\nmodule_name = \"from-file\"\n",
    )?;
    let parsed = args(&[
        "bundle.json",
        "--options",
        options.as_str(),
        "--servlet-level",
        "40",
    ])?;
    let resolved = resolve_options(&parsed)?;
    ensure!(u16::from(resolved.servlet_level) == 40);
    ensure!(resolved.module_name.as_deref() == Some("from-file"));
    Ok(())
}

#[rstest]
fn unsupported_servlet_level_is_rejected() -> Result<()> {
    let parsed = args(&["bundle.json", "--servlet-level", "25"])?;
    ensure!(resolve_options(&parsed).is_err());
    Ok(())
}

#[rstest]
fn binary_exits_non_zero_on_conflicts(workspace: Workspace) -> Result<()> {
    let exe = env!("CARGO_BIN_EXE_merge-descriptors");
    let bundle = workspace.file("bundle.json", FRAGMENTS_DISAGREE)?;
    let output = Command::new(exe).arg(bundle.as_str()).output()?;
    ensure!(!output.status.success());
    ensure!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    ensure!(stderr.contains("timeout"), "stderr should name the field: {stderr}");
    Ok(())
}
