use std::{collections::HashMap, sync::Arc};

use anyhow::Context as _;
use serenity::{
    builder::{CreateCommand, CreateInteractionResponse},
    model::application::CommandInteraction,
};

use super::{
    command::CommandInfo,
    handler,
    response::{BorrowedResponder, BorrowingResponder, Message},
    rest::CommandRest,
    visitor::{self, CommandVisitor},
};

type CommandHandler<C> = Arc<dyn handler::CommandHandler<C>>;
type FallbackHandler<C> = Arc<dyn handler::FallbackHandler<C>>;

const UNKNOWN_COMMAND: &str = "Unknown command - this may be a bug.";

/// The result of synchronizing the registered global command set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The registered command count already matched, so nothing was sent
    Unchanged(usize),
    /// The command set was overwritten, leaving the given number registered
    Overwritten(usize),
}

/// A self-contained registry of interaction handlers, which can register and
/// dispatch response logic to each handler
#[derive(Debug)]
pub struct Registry<C> {
    infos: Vec<CommandInfo>,
    commands: HashMap<String, CommandHandler<C>>,
    fallback: Option<FallbackHandler<C>>,
}

impl<C> Registry<C> {
    /// Construct a new registry from the given set of handlers
    ///
    /// # Panics
    /// This function panics if two handlers register the same command name.
    #[must_use]
    pub fn new(handlers: handler::Handlers<C>) -> Self {
        let handler::Handlers { commands, fallback } = handlers;
        let mut infos = Vec::with_capacity(commands.len());
        let mut map = HashMap::with_capacity(commands.len());

        for cmd in commands {
            let info = cmd.register_global();
            let name = info.name().to_owned();
            assert!(
                map.insert(name.clone(), cmd).is_none(),
                "Duplicate command name {name:?}"
            );
            infos.push(info);
        }

        Self {
            infos,
            commands: map,
            fallback,
        }
    }

    /// Get the number of commands this registry registers with Discord
    #[inline]
    #[must_use]
    pub fn command_count(&self) -> usize { self.infos.len() }

    fn pretty_handler_error(err: handler::HandlerError<'_>, desc: &'static str) -> Option<Message> {
        match err {
            handler::HandlerError::Parse(err) => match err {
                visitor::Error::GuildRequired => {
                    tracing::debug!(%err, "Responding with guild error");
                    Message::rich(|b| {
                        b.push_bold("ERROR:")
                            .push(" This ")
                            .push(desc)
                            .push(" must be run inside a server.")
                    })
                    .ephemeral(true)
                    .into()
                },
                err => {
                    tracing::error!(%err, "Unexpected error parsing {desc}");
                    Message::rich(|b| {
                        b.push("Unexpected error parsing ")
                            .push(desc)
                            .push(": ")
                            .push_mono_safe(err.to_string())
                    })
                    .ephemeral(true)
                    .into()
                },
            },
            handler::HandlerError::User(err, _res) => {
                tracing::debug!(err, "Handler for {desc} responded to user with error");
                None
            },
            handler::HandlerError::Other(err) => {
                tracing::error!(?err, "Unexpected error handling {desc}");
                Message::rich(|b| b.push("Unexpected error: ").push_mono_safe(err.to_string()))
                    .ephemeral(true)
                    .into()
            },
        }
    }

    /// Register all commands with Discord
    ///
    /// The full command set is overwritten in a single call, and only if the
    /// number of currently registered global commands differs from the number
    /// of commands in this registry.
    ///
    /// # Errors
    /// This method returns an error if an API error response is received during
    /// registration.
    #[tracing::instrument(level = "info", skip(self, rest))]
    pub async fn init(&self, rest: &(impl CommandRest + ?Sized)) -> Result<SyncOutcome, anyhow::Error> {
        let existing = rest
            .global_command_names()
            .await
            .context("Error fetching initial command list")?;
        let expected = self.infos.len();

        if existing.len() == expected {
            tracing::info!(count = expected, "Global command count matches, skipping registration");
            return Ok(SyncOutcome::Unchanged(expected));
        }

        tracing::info!(
            ?existing,
            expected,
            "Global command count differs, overwriting commands"
        );
        let count = rest
            .overwrite_global_commands(self.infos.iter().cloned().map(CreateCommand::from).collect())
            .await
            .context("Error overwriting global commands")?;

        Ok(SyncOutcome::Overwritten(count))
    }

    /// Dispatch a command interaction to the proper handler and return the
    /// response it produced, if any
    #[tracing::instrument(
        level = "error",
        name = "handle_command",
        skip_all,
        fields(name = %aci.data.name, id = %aci.id, user = %aci.user.id, guild = ?aci.guild_id),
    )]
    pub async fn handle_command(
        &self,
        ctx: &C,
        aci: &CommandInteraction,
    ) -> Option<CreateInteractionResponse> {
        tracing::info!("Handling application command");

        let handler = self.commands.get(aci.data.name.as_str());
        let mut vis = CommandVisitor::new(aci);
        let mut responder = BorrowedResponder::default();

        let res = match (handler, &self.fallback) {
            (Some(handler), _) => {
                tracing::debug!(?handler, "Command handler selected");
                handler
                    .respond(ctx, &mut vis, BorrowingResponder::new(&mut responder))
                    .await
            },
            (None, Some(fallback)) => {
                tracing::debug!(?fallback, "No handler registered, using fallback");
                fallback
                    .respond(ctx, &mut vis, BorrowingResponder::new(&mut responder))
                    .await
            },
            (None, None) => {
                tracing::warn!("No handler registered for command");
                Ok(BorrowingResponder::new(&mut responder)
                    .create_message(Message::plain(UNKNOWN_COMMAND).ephemeral(true))
                    .into())
            },
        };

        let ok = res.is_ok();
        let msg = res
            .err()
            .and_then(|e| Self::pretty_handler_error(e, "command"));

        if ok && handler.is_some() {
            if let Err(err) = vis.finish() {
                tracing::warn!(%err, "Command handler left options unread");
            }
        }

        if let Some(msg) = msg {
            if responder.is_init() {
                responder.init().create_message(msg);
            } else {
                tracing::debug!("Response already settled, dropping error message");
            }
        }

        responder.into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use serde_json::{json, Value};
    use serenity::builder::{CreateCommand, CreateInteractionResponse};

    use super::{Registry, SyncOutcome};
    use crate::interaction::{
        command::CommandInfo,
        fixture,
        handler::{
            CommandHandler, CommandResponder, CommandResult, CommandVisitor, FallbackHandler,
            Handlers,
        },
        response::Message,
        rest::CommandRest,
    };

    #[derive(Debug, Default)]
    struct FakeRest {
        registered: Vec<String>,
        overwrites: Mutex<Vec<Vec<Value>>>,
    }

    #[async_trait::async_trait]
    impl CommandRest for FakeRest {
        async fn global_command_names(&self) -> Result<Vec<String>, serenity::Error> {
            Ok(self.registered.clone())
        }

        async fn overwrite_global_commands(
            &self,
            commands: Vec<CreateCommand>,
        ) -> Result<usize, serenity::Error> {
            let json = commands
                .iter()
                .map(|c| serde_json::to_value(c).unwrap())
                .collect();
            self.overwrites.lock().unwrap().push(json);
            Ok(commands.len())
        }
    }

    #[derive(Debug)]
    struct Echo(&'static str);

    #[async_trait::async_trait]
    impl CommandHandler<AtomicUsize> for Echo {
        fn register_global(&self) -> CommandInfo {
            CommandInfo::build_slash(self.0, "Echo a word", |a| a.string("word", "A word", false))
                .unwrap()
        }

        async fn respond<'a>(
            &self,
            ctx: &AtomicUsize,
            visitor: &mut CommandVisitor<'_>,
            responder: CommandResponder<'a>,
        ) -> CommandResult<'a> {
            ctx.fetch_add(1, Ordering::SeqCst);
            let word = visitor.visit_string("word")?.required()?;
            Ok(responder.create_message(Message::plain(word)).into())
        }
    }

    #[derive(Debug)]
    struct Shrug;

    #[async_trait::async_trait]
    impl FallbackHandler<AtomicUsize> for Shrug {
        async fn respond<'a>(
            &self,
            _: &AtomicUsize,
            _: &mut CommandVisitor<'_>,
            responder: CommandResponder<'a>,
        ) -> CommandResult<'a> {
            Ok(responder
                .create_message(Message::plain("shrug").ephemeral(true))
                .into())
        }
    }

    fn registry(fallback: bool) -> Registry<AtomicUsize> {
        Registry::new(Handlers {
            commands: vec![Arc::new(Echo("echo")), Arc::new(Echo("say"))],
            fallback: fallback.then(|| Arc::new(Shrug) as Arc<dyn FallbackHandler<_>>),
        })
    }

    fn content(res: Option<CreateInteractionResponse>) -> Value {
        let res = res.expect("expected a response");
        serde_json::to_value(res).unwrap()["data"].clone()
    }

    #[tokio::test]
    async fn skips_registration_when_count_matches() {
        let rest = FakeRest {
            registered: vec!["old".into(), "older".into()],
            ..FakeRest::default()
        };

        assert_eq!(registry(true).init(&rest).await.unwrap(), SyncOutcome::Unchanged(2));
        assert!(rest.overwrites.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn overwrites_when_count_differs() {
        let rest = FakeRest {
            registered: vec!["echo".into()],
            ..FakeRest::default()
        };

        assert_eq!(registry(true).init(&rest).await.unwrap(), SyncOutcome::Overwritten(2));

        let calls = rest.overwrites.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let names: Vec<_> = calls[0].iter().map(|c| c["name"].clone()).collect();
        assert_eq!(names, [json!("echo"), json!("say")]);
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let ctx = AtomicUsize::new(0);
        let aci = fixture::command_interaction(&fixture::guild_command(
            "say",
            json!([{ "name": "word", "type": 3, "value": "hello" }]),
            json!({}),
        ));

        let data = content(registry(true).handle_command(&ctx, &aci).await);
        assert_eq!(data["content"], "hello");
        assert_eq!(ctx.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_commands_use_fallback() {
        let ctx = AtomicUsize::new(0);
        let aci = fixture::command_interaction(&fixture::guild_command(
            "nope",
            json!([]),
            json!({}),
        ));

        let data = content(registry(true).handle_command(&ctx, &aci).await);
        assert_eq!(data["content"], "shrug");
        assert_eq!(data["flags"], 64);
        assert_eq!(ctx.load(Ordering::SeqCst), 0);

        let data = content(registry(false).handle_command(&ctx, &aci).await);
        assert_eq!(data["content"], super::UNKNOWN_COMMAND);
    }

    #[tokio::test]
    async fn parse_errors_become_ephemeral_replies() {
        let ctx = AtomicUsize::new(0);
        let aci = fixture::command_interaction(&fixture::guild_command(
            "echo",
            json!([{ "name": "word", "type": 4, "value": 7 }]),
            json!({}),
        ));

        let data = content(registry(true).handle_command(&ctx, &aci).await);
        assert!(data["content"]
            .as_str()
            .unwrap()
            .starts_with("Unexpected error parsing command: "));
        assert_eq!(data["flags"], 64);
    }

    #[tokio::test]
    async fn trailing_options_keep_reply() {
        let ctx = AtomicUsize::new(0);
        let aci = fixture::command_interaction(&fixture::guild_command(
            "echo",
            json!([
                { "name": "word", "type": 3, "value": "hi" },
                { "name": "extra", "type": 5, "value": true },
            ]),
            json!({}),
        ));

        let data = content(registry(true).handle_command(&ctx, &aci).await);
        assert_eq!(data["content"], "hi");
    }
}
