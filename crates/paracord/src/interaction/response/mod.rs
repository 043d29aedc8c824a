//! Types for responding to interactions according to the Discord webhook
//! protocol in a type-safe manner

mod message;
mod responder;

pub use message::*;
pub use responder::*;
