//! Step definitions for the merge scenarios.

use anyhow::{Result, anyhow, ensure};
use descriptor_merge::{MergeOptions, ModuleDescriptor, ModuleInputs, NoDiscovery, merge_module};
use rstest_bdd_macros::{given, then, when};
use test_helpers::{
    descriptors::{library, with_context_params, with_session_timeout},
    text::unquote,
};

use super::fixtures::MergeState;

fn push_fragment(merge_state: &MergeState, jar: &str, descriptor: ModuleDescriptor) {
    let mut fragments = merge_state.fragments.take().unwrap_or_default();
    fragments.push(library(unquote(jar), descriptor));
    merge_state.fragments.set(fragments);
}

#[given("an empty primary descriptor")]
fn empty_primary(merge_state: &MergeState) {
    merge_state.primary.set(ModuleDescriptor::default());
}

#[given("a primary descriptor with session timeout {minutes:u32}")]
fn primary_timeout(merge_state: &MergeState, minutes: u32) {
    merge_state.primary.set(with_session_timeout(minutes));
}

#[given("a fragment {jar} with session timeout {minutes:u32}")]
fn fragment_timeout(merge_state: &MergeState, jar: String, minutes: u32) {
    push_fragment(merge_state, &jar, with_session_timeout(minutes));
}

#[given("a fragment {jar} with context parameter {name} set to {value}")]
fn fragment_param(merge_state: &MergeState, jar: String, name: String, value: String) {
    let descriptor = with_context_params(&[(unquote(&name), unquote(&value))]);
    push_fragment(merge_state, &jar, descriptor);
}

#[when("the module is merged")]
fn merge(merge_state: &MergeState) -> Result<()> {
    let primary = merge_state
        .primary
        .take()
        .ok_or_else(|| anyhow!("no primary descriptor was given"))?;
    let inputs = merge_state
        .fragments
        .take()
        .unwrap_or_default()
        .into_iter()
        .fold(ModuleInputs::new(primary), ModuleInputs::with_fragment);
    let outcome = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default());
    merge_state.outcome.set(outcome);
    Ok(())
}

#[then("the merged session timeout is {minutes:u32}")]
fn merged_timeout(merge_state: &MergeState, minutes: u32) -> Result<()> {
    let timeout = merge_state
        .outcome
        .with_ref(|outcome| outcome.as_ref().ok().and_then(|m| m.config().session.timeout))
        .flatten();
    ensure!(timeout == Some(minutes), "got {timeout:?}");
    Ok(())
}

#[then("{count:usize} diagnostic is reported")]
fn diagnostic_count(merge_state: &MergeState, count: usize) -> Result<()> {
    let reported = merge_state
        .outcome
        .with_ref(|outcome| outcome.as_ref().map(|m| m.diagnostics().len()).ok())
        .flatten()
        .ok_or_else(|| anyhow!("the merge did not succeed"))?;
    ensure!(reported == count, "got {reported} diagnostics");
    Ok(())
}

#[then("the merge fails with {count:usize} conflict on {field}")]
fn conflict_count(merge_state: &MergeState, count: usize, field: String) -> Result<()> {
    let outcome = merge_state
        .outcome
        .take()
        .ok_or_else(|| anyhow!("the module was not merged"))?;
    let err = outcome.err().ok_or_else(|| anyhow!("expected the merge to fail"))?;
    let conflicts = err.conflicts();
    ensure!(conflicts.len() == count, "got {err}");
    let expected = unquote(&field);
    ensure!(conflicts.iter().all(|c| c.field == expected), "got {err}");
    Ok(())
}
