//! Error types produced while merging module descriptors.

mod aggregate;
mod conflict;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use conflict::Conflict;
pub use types::MergeError;
