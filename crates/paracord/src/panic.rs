//! Helpers for reporting caught panics

use std::any::Any;

/// Extract the message from a panic payload, if it carries one
#[must_use]
pub fn payload_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return s;
    }

    if let Some(s) = payload.downcast_ref::<String>() {
        return s.as_str();
    }

    "Box<dyn Any>"
}
