//! Shared fixtures for the merge scenarios.

use descriptor_merge::{Fragment, MergeResult, MergedModule, ModuleDescriptor};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Inputs gathered by `given` steps and the outcome of the merge.
#[derive(Debug, Default, ScenarioState)]
pub struct MergeState {
    pub primary: Slot<ModuleDescriptor>,
    pub fragments: Slot<Vec<Fragment>>,
    pub outcome: Slot<MergeResult<MergedModule>>,
}

/// Creates an empty merge state.
#[fixture]
pub fn merge_state() -> MergeState {
    MergeState::default()
}
