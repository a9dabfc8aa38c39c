//! Binds the feature files to the merge fixtures.

use super::fixtures::{MergeState, merge_state};
use rstest_bdd_macros::scenario;

#[scenario(path = "tests/features/merge_precedence.feature")]
fn merge_precedence(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(path = "tests/features/fragment_conflicts.feature")]
fn fragment_conflicts(merge_state: MergeState) {
    let _ = merge_state;
}
