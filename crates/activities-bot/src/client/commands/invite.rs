use super::prelude::*;

#[derive(Debug)]
pub struct InviteCommand;

#[async_trait]
impl Handler<AppContext> for InviteCommand {
    fn register_global(&self) -> CommandInfo {
        CommandInfo::slash("invite", "Invite me to your server.", Args::default())
    }

    async fn respond<'a>(
        &self,
        ctx: &AppContext,
        _: &mut Visitor<'_>,
        responder: CommandResponder<'a>,
    ) -> CommandResult<'a> {
        Ok(responder
            .create_message(ctx.invite_reply.message())
            .into())
    }
}
