//! Test helpers shared across crates in the workspace.
//!
//! - [`figment`] runs option loading inside a `figment::Jail`.
//! - [`descriptors`] builds descriptor values with terse constructors.
//! - [`scan`] builds discovery fakes, including one that always fails.
//! - [`text`] normalizes values captured by behavioural step definitions.

pub mod descriptors;
pub mod figment;
pub mod scan;
pub mod text;
