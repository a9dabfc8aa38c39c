//! `rstest-bdd` scenarios for `descriptor_merge`.
//!
//! Fixtures hold the descriptors assembled by `given` steps; the scenarios
//! module binds each feature file to them.

mod fixtures;
mod scenarios;
mod steps;
