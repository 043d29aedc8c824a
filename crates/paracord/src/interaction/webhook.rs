//! Signature verification and dispatch for interactions received over HTTP

use std::{fmt, panic::AssertUnwindSafe, sync::Arc};

use anyhow::Context as _;
use futures_util::FutureExt;
use serde_json::{json, Value};
use serenity::{
    builder::CreateInteractionResponse, interactions_endpoint::Verifier,
    model::application::Interaction,
};
use tokio::sync::broadcast;

use super::{event::Event, Registry};
use crate::panic::payload_message;

/// Header carrying the hex-encoded request signature
pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
/// Header carrying the timestamp prepended to the body before signing
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

const EVENT_CAPACITY: usize = 64;

/// An error arising from parsing an application public key
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The key was not the expected number of hex digits
    #[error("Public key must be 64 hex digits, found {0} characters")]
    Length(usize),
    /// The key contained a non-hex character
    #[error("Public key is not valid hex")]
    Hex(#[from] hex::FromHexError),
    /// The key bytes do not describe a valid ed25519 point
    #[error("Public key is not a valid ed25519 key")]
    Invalid,
}

/// An application's ed25519 public key, used to verify interaction requests
pub struct PublicKey {
    bytes: [u8; 32],
    verifier: Verifier,
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey")
            .field(&hex::encode(self.bytes))
            .finish()
    }
}

impl PublicKey {
    /// Parse a public key from its 64-digit hex representation
    ///
    /// # Errors
    /// This function returns an error if the input is not 64 hex digits or
    /// does not describe a valid ed25519 key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let s = s.trim();
        if s.len() != 64 {
            return Err(KeyError::Length(s.chars().count()));
        }

        let mut bytes = [0_u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;

        let verifier = Verifier::try_new(bytes).map_err(|_| KeyError::Invalid)?;
        Ok(Self { bytes, verifier })
    }

    /// Check a request signature against this key
    #[must_use]
    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> bool {
        self.verifier.verify(signature, timestamp, body).is_ok()
    }
}

/// The outcome of handling one webhook request
#[derive(Debug)]
pub enum Reply {
    /// The request signature was missing or invalid
    Unauthorized,
    /// The request was a heartbeat
    Pong,
    /// A command produced a response
    Message(CreateInteractionResponse),
    /// A command was handled but produced no response
    Silent,
    /// The request body could not be handled
    BadRequest,
    /// A handler panicked
    Failed,
}

impl Reply {
    /// The HTTP status code this reply should be sent with
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Pong | Self::Message(_) => 200,
            Self::Silent => 204,
            Self::Unauthorized | Self::BadRequest => 400,
            Self::Failed => 500,
        }
    }

    /// The JSON body to send with this reply, if any
    ///
    /// Heartbeats are acknowledged with exactly `{"type":1}`.
    ///
    /// # Errors
    /// This method returns an error if a command response fails to serialize.
    pub fn into_body(self) -> Result<Option<Value>, serde_json::Error> {
        match self {
            Self::Pong => Ok(Some(json!({ "type": 1 }))),
            Self::Message(res) => serde_json::to_value(res).map(Some),
            Self::Unauthorized | Self::Silent | Self::BadRequest | Self::Failed => Ok(None),
        }
    }
}

/// A verifying receiver for interactions delivered over HTTP
#[derive(Debug)]
pub struct Webhook<C> {
    key: PublicKey,
    registry: Registry<C>,
    ctx: C,
    events: broadcast::Sender<Event>,
}

impl<C> Webhook<C> {
    /// Construct a new receiver dispatching commands to the given registry
    #[must_use]
    pub fn new(key: PublicKey, registry: Registry<C>, ctx: C) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            key,
            registry,
            ctx,
            events,
        }
    }

    /// Listen for events emitted while handling requests
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> { self.events.subscribe() }

    fn emit(&self, event: Event) {
        // No subscribers is not an error
        self.events.send(event).ok();
    }
}

impl<C: Send + Sync> Webhook<C> {
    async fn dispatch(&self, body: &[u8]) -> Result<Reply, anyhow::Error> {
        let int: Interaction =
            serde_json::from_slice(body).context("Error parsing interaction payload")?;

        match int {
            Interaction::Ping(ping) => {
                tracing::debug!(id = %ping.id, "Responding to ping");
                self.emit(Event::Ping);
                Ok(Reply::Pong)
            },
            Interaction::Command(aci) => Ok(
                match self.registry.handle_command(&self.ctx, &aci).await {
                    Some(res) => Reply::Message(res),
                    None => Reply::Silent,
                },
            ),
            int => Err(anyhow::anyhow!(
                "Unsupported interaction type {:?}",
                int.kind()
            )),
        }
    }

    /// Verify and handle a single request
    ///
    /// Errors and panics raised while handling a verified request are
    /// reported as [`Event::InteractionError`] rather than propagated.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn handle(&self, signature: Option<&str>, timestamp: Option<&str>, body: &[u8]) -> Reply {
        let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
            tracing::debug!("Rejecting request with missing signature headers");
            return Reply::Unauthorized;
        };

        if !self.key.verify(signature, timestamp, body) {
            tracing::debug!("Rejecting request with invalid signature");
            return Reply::Unauthorized;
        }

        match AssertUnwindSafe(self.dispatch(body)).catch_unwind().await {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                tracing::error!(?err, "Error handling interaction");
                self.emit(Event::InteractionError(Arc::new(err)));
                Reply::BadRequest
            },
            Err(payload) => {
                let msg = payload_message(&*payload);
                tracing::error!(msg, "Interaction handler panicked");
                self.emit(Event::InteractionError(Arc::new(anyhow::anyhow!(
                    "Interaction handler panicked: {msg}"
                ))));
                Reply::Failed
            },
        }
    }
}
