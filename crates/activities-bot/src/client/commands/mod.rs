use paracord::interaction::handler::Handlers;
use serenity::model::id::ApplicationId;

use self::prelude::{AppContext, Message, Url};

mod activity;
mod fallback;
mod invite;

pub(self) mod prelude {
    pub use paracord::interaction::{
        command::{Args, CommandInfo},
        handler::{
            CommandHandler as Handler, CommandResponder, CommandResult, CommandVisitor as Visitor,
            FallbackHandler, IntoErr,
        },
        response::Message,
    };
    pub use serenity::model::channel::ChannelType;

    pub use super::super::AppContext;
    pub use crate::prelude::*;
}

const SOURCE_URL: &str = "https://github.com/DjDeveloperr/ActivitiesBot";
const SUPPORT_URL: &str = "https://discord.gg/WVN2JF2FRv";

/// Links advertised by the invite command
#[derive(Debug, Clone, clap::Args)]
pub struct LinkOpts {
    /// Link to the bot's source repository
    #[arg(long, env, default_value = SOURCE_URL)]
    source_url: Url,

    /// Link to the support server
    #[arg(long, env, default_value = SUPPORT_URL)]
    support_url: Url,
}

/// The fixed reply sent by the invite command
#[derive(Debug, Clone)]
pub struct InviteReply(Message);

impl InviteReply {
    pub fn new(application_id: ApplicationId, links: &LinkOpts) -> Self {
        let LinkOpts {
            source_url,
            support_url,
        } = links;

        Self(
            Message::rich(|b| {
                b.push("• [Click here to invite.](<https://discord.com/api/oauth2/authorize?client_id=")
                    .push(application_id.to_string())
                    .push("&permissions=1&scope=applications.commands%20bot>)\n")
                    .push(format!("• [Check out Source Code.](<{source_url}>)\n"))
                    .push(format!("• [Join our Discord.](<{support_url}>)"))
            })
            .ephemeral(true),
        )
    }

    #[inline]
    pub fn message(&self) -> Message { self.0.clone() }
}

pub fn handlers() -> Handlers<AppContext> {
    use prelude::Arc;

    Handlers {
        commands: vec![
            Arc::new(invite::InviteCommand),
            Arc::new(activity::ActivityCommand),
        ],
        fallback: Some(Arc::new(fallback::UnhandledCommand)),
    }
}

#[cfg(test)]
mod test_util {
    use std::sync::Arc;

    use paracord::interaction::{fixture, Registry};
    use serde_json::Value;
    use serenity::model::id::ApplicationId;
    use url::Url;

    use super::{handlers, LinkOpts, SOURCE_URL, SUPPORT_URL};
    use crate::client::{rest::fake::RecordingRest, AppContext};

    pub const BOT_ID: u64 = 819_835_984_388_030_464;

    impl Default for LinkOpts {
        fn default() -> Self {
            Self {
                source_url: Url::parse(SOURCE_URL).unwrap(),
                support_url: Url::parse(SUPPORT_URL).unwrap(),
            }
        }
    }

    /// Dispatch a command payload through a fresh registry, returning the
    /// serialized response if one was produced
    pub async fn respond(rest: Arc<RecordingRest>, payload: &Value) -> Option<Value> {
        let ctx = AppContext::new(rest, ApplicationId::new(BOT_ID), &LinkOpts::default());
        let aci = fixture::command_interaction(payload);

        Registry::new(handlers())
            .handle_command(&ctx, &aci)
            .await
            .map(|r| serde_json::to_value(r).unwrap())
    }
}

#[cfg(test)]
pub(super) use test_util::BOT_ID;
