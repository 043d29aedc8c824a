//! Helper types for serving Discord application interactions from an HTTP
//! webhook with Serenity
//!
//! The entry point is [`interaction::Webhook`], which verifies and decodes
//! raw requests and hands command invocations to an
//! [`interaction::Registry`] of typed handlers.

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod interaction;
pub mod panic;
