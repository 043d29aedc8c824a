//! Types for constructing command descriptions to be registered with Discord

mod arg;
mod arg_builder;
mod info;

pub use arg::*;
pub use arg_builder::*;
pub use info::*;

/// An error resulting from building an invalid command description
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Error building command: {0}")]
pub struct TryFromError(pub &'static str);
