use super::prelude::*;

#[derive(Debug)]
pub struct UnhandledCommand;

#[async_trait]
impl FallbackHandler<AppContext> for UnhandledCommand {
    async fn respond<'a>(
        &self,
        _: &AppContext,
        visitor: &mut Visitor<'_>,
        responder: CommandResponder<'a>,
    ) -> CommandResult<'a> {
        debug!(name = visitor.command_name(), "Unhandled command received");

        Ok(responder
            .create_message(Message::plain("Unhandled Command").ephemeral(true))
            .into())
    }
}
