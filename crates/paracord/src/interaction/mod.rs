//! Types and support traits for responding to application interaction events

pub mod command;
pub mod event;
#[cfg(any(test, feature = "test-util"))]
pub mod fixture;
pub mod handler;
mod registry;
pub mod response;
pub mod rest;
pub mod visitor;
pub mod webhook;

pub use registry::{Registry, SyncOutcome};
pub use webhook::{PublicKey, Reply, Webhook};
