//! Interaction payloads and request signing for tests
//!
//! Payloads mirror what Discord delivers to an interactions endpoint, with
//! every snowflake encoded as a string.

#![allow(clippy::missing_panics_doc)]

use ed25519_dalek::{Signer as _, SigningKey};
use serde_json::{json, Value};
use serenity::model::application::{CommandInteraction, Interaction};

/// Application ID used by every fixture payload
pub const APPLICATION_ID: &str = "819778342818414632";
/// Guild ID used by guild fixture payloads
pub const GUILD_ID: &str = "783319033205751809";
/// ID of the invoking user
pub const USER_ID: &str = "422087909634736160";
/// ID of the text channel commands are invoked from
pub const TEXT_CHANNEL_ID: &str = "783319033730564098";
/// ID of a voice channel usable as a command option
pub const VOICE_CHANNEL_ID: &str = "783319033730564099";
/// Interaction token used by every fixture payload
pub const TOKEN: &str = "aW50ZXJhY3Rpb246ODE5Nzc4MzQyODE4NDE0NjMy";

/// Signs request bodies the way Discord does
#[derive(Debug)]
pub struct Signer(SigningKey);

impl Default for Signer {
    fn default() -> Self { Self::new([7; 32]) }
}

impl Signer {
    /// Construct a signer from a secret key
    #[must_use]
    pub fn new(secret: [u8; 32]) -> Self { Self(SigningKey::from_bytes(&secret)) }

    /// Get the hex-encoded public key matching this signer
    #[must_use]
    pub fn public_key_hex(&self) -> String { hex::encode(self.0.verifying_key().to_bytes()) }

    /// Produce the hex-encoded signature header for the given timestamp and
    /// body
    #[must_use]
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        let mut msg = timestamp.as_bytes().to_vec();
        msg.extend_from_slice(body);
        hex::encode(self.0.sign(&msg).to_bytes())
    }
}

fn user() -> Value {
    json!({
        "id": USER_ID,
        "username": "wumpus",
        "discriminator": "0",
        "global_name": "Wumpus",
        "avatar": null,
        "public_flags": 0,
    })
}

fn member() -> Value {
    json!({
        "user": user(),
        "nick": null,
        "avatar": null,
        "roles": [],
        "joined_at": "2021-01-01T00:00:00.000000+00:00",
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
        "permissions": "2147483647",
        "communication_disabled_until": null,
        "guild_id": GUILD_ID,
    })
}

fn command_data(name: &str, options: Value, resolved: Value) -> Value {
    json!({
        "id": "867794291820986368",
        "name": name,
        "type": 1,
        "options": options,
        "resolved": resolved,
    })
}

/// A heartbeat interaction
#[must_use]
pub fn ping() -> Value {
    json!({
        "id": "867794291820986369",
        "application_id": APPLICATION_ID,
        "type": 1,
        "token": TOKEN,
        "version": 1,
    })
}

/// A chat input command invoked from a guild text channel
#[must_use]
pub fn guild_command(name: &str, options: Value, resolved: Value) -> Value {
    json!({
        "id": "867794291820986370",
        "application_id": APPLICATION_ID,
        "type": 2,
        "data": command_data(name, options, resolved),
        "guild_id": GUILD_ID,
        "channel_id": TEXT_CHANNEL_ID,
        "channel": { "id": TEXT_CHANNEL_ID, "name": "general", "type": 0 },
        "member": member(),
        "user": user(),
        "token": TOKEN,
        "version": 1,
        "app_permissions": "2147483647",
        "attachment_size_limit": 10_485_760,
        "locale": "en-US",
        "guild_locale": "en-US",
        "entitlements": [],
        "authorizing_integration_owners": { "0": GUILD_ID },
        "context": 0,
    })
}

/// A chat input command invoked from a direct message
#[must_use]
pub fn dm_command(name: &str, options: Value, resolved: Value) -> Value {
    json!({
        "id": "867794291820986371",
        "application_id": APPLICATION_ID,
        "type": 2,
        "data": command_data(name, options, resolved),
        "channel_id": TEXT_CHANNEL_ID,
        "channel": { "id": TEXT_CHANNEL_ID, "type": 1 },
        "user": user(),
        "token": TOKEN,
        "version": 1,
        "app_permissions": "2147483647",
        "attachment_size_limit": 10_485_760,
        "locale": "en-US",
        "entitlements": [],
        "authorizing_integration_owners": { "1": USER_ID },
        "context": 1,
    })
}

/// Resolved data containing a single channel
#[must_use]
pub fn resolved_channel(id: &str, name: &str, kind: u8) -> Value {
    json!({
        "channels": {
            id: { "id": id, "name": name, "type": kind, "permissions": "2147483647" },
        },
    })
}

/// Deserialize a command interaction payload
///
/// # Panics
/// This function panics if the payload is not a valid command interaction.
#[must_use]
pub fn command_interaction(payload: &Value) -> CommandInteraction {
    match serde_json::from_value(payload.clone()) {
        Ok(Interaction::Command(aci)) => aci,
        Ok(other) => panic!("Expected a command interaction, got {:?}", other.kind()),
        Err(err) => panic!("Invalid interaction payload: {err}"),
    }
}
