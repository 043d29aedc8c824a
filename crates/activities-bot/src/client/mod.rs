use paracord::interaction::{event::Event, webhook::KeyError, PublicKey, Registry, Webhook};
use serenity::{http::Http, model::id::ApplicationId};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{prelude::*, util::DebugShim};

mod activities;
mod commands;
mod rest;

pub use commands::LinkOpts;
#[cfg(test)]
pub(crate) use rest::fake::RecordingRest;
pub use rest::{ActivityInvite, InviteRest};

#[derive(Debug, clap::Args)]
pub struct ClientOpts {
    /// Hex-encoded public key of the Discord application
    #[arg(long, env = "PUBLIC_KEY")]
    public_key: String,

    /// The Discord API token to use
    #[arg(long, env = "TOKEN")]
    token: DebugShim<String>,

    /// ID of the Discord application
    #[arg(long, env = "ID")]
    application_id: u64,

    #[command(flatten)]
    links: LinkOpts,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid application public key")]
    PublicKey(#[from] KeyError),
    #[error("Discord API token is empty")]
    EmptyToken,
    #[error("Application ID must be nonzero")]
    ZeroApplicationId,
}

/// Validated startup configuration
#[derive(Debug)]
pub struct Config {
    public_key: PublicKey,
    token: DebugShim<String>,
    application_id: ApplicationId,
    links: LinkOpts,
}

impl ClientOpts {
    pub fn validate(self) -> Result<Config, ConfigError> {
        let Self {
            public_key,
            token,
            application_id,
            links,
        } = self;

        let public_key = PublicKey::from_hex(&public_key)?;

        if token.0.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        if application_id == 0 {
            return Err(ConfigError::ZeroApplicationId);
        }

        Ok(Config {
            public_key,
            token,
            application_id: ApplicationId::new(application_id),
            links,
        })
    }
}

/// Shared state passed to every command handler
#[derive(Debug)]
pub struct AppContext {
    invites: DebugShim<Arc<dyn InviteRest>>,
    invite_reply: commands::InviteReply,
}

impl AppContext {
    pub fn new(
        invites: Arc<dyn InviteRest>,
        application_id: ApplicationId,
        links: &LinkOpts,
    ) -> Self {
        Self {
            invites: invites.into(),
            invite_reply: commands::InviteReply::new(application_id, links),
        }
    }
}

async fn log_events(mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Ping) => debug!("Ping received"),
            Ok(Event::InteractionError(err)) => error!(?err, "Interaction failed"),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

#[instrument(level = "error", skip(config))]
pub async fn build(config: Config) -> Result<Arc<Webhook<AppContext>>> {
    let Config {
        public_key,
        token,
        application_id,
        links,
    } = config;

    let http = Arc::new(Http::new(&token.0));
    http.set_application_id(application_id);

    let registry = Registry::new(commands::handlers());
    let outcome = registry
        .init(&*http)
        .await
        .context("Error registering commands")?;
    info!(?outcome, "Commands registered");

    let ctx = AppContext::new(http, application_id, &links);
    let webhook = Arc::new(Webhook::new(public_key, registry, ctx));
    tokio::spawn(log_events(webhook.subscribe()));

    Ok(webhook)
}

/// Construct a webhook verifying requests from the given signer, backed by the
/// given recording REST client
#[cfg(test)]
pub fn test_webhook(
    signer: &paracord::interaction::fixture::Signer,
    rest: Arc<RecordingRest>,
) -> Webhook<AppContext> {
    let key = PublicKey::from_hex(&signer.public_key_hex()).unwrap();
    let ctx = AppContext::new(
        rest,
        ApplicationId::new(commands::BOT_ID),
        &LinkOpts::default(),
    );

    Webhook::new(key, Registry::new(commands::handlers()), ctx)
}
