//! Notifications emitted by the webhook receiver

use std::sync::Arc;

/// An out-of-band notification about a received interaction
#[derive(Debug, Clone)]
pub enum Event {
    /// A verified heartbeat was received and acknowledged
    Ping,
    /// Handling a verified interaction failed with an error or a panic
    InteractionError(Arc<anyhow::Error>),
}
