use super::prelude::*;
use crate::client::{
    activities::{self, ACTIVITIES},
    ActivityInvite,
};

#[derive(Debug)]
pub struct ActivityCommand;

#[async_trait]
impl Handler<AppContext> for ActivityCommand {
    fn register_global(&self) -> CommandInfo {
        CommandInfo::build_slash("activity", "Start an Activity in a Voice Channel.", |a| {
            a.channel("channel", "Voice Channel to start activity in.", true, [])
                .string_choice(
                    "activity",
                    "Activity to start.",
                    true,
                    ACTIVITIES.iter().map(|a| (a.name, a.key)),
                )
        })
        .unwrap()
    }

    async fn respond<'a>(
        &self,
        ctx: &AppContext,
        visitor: &mut Visitor<'_>,
        responder: CommandResponder<'a>,
    ) -> CommandResult<'a> {
        if visitor.guild()?.optional().is_none() {
            debug!("Ignoring activity request sent outside a server");
            return Ok(responder.decline().into());
        }

        let channel = visitor.visit_channel("channel")?.lookup().found();
        let activity = visitor
            .visit_string("activity")?
            .lookup()
            .found()
            .and_then(activities::find);

        let (Some(channel), Some(activity)) = (channel, activity) else {
            return Err(responder
                .create_message(Message::plain("Invalid interaction.").ephemeral(true))
                .into_err("Missing channel or unknown activity"));
        };

        if channel.kind != ChannelType::Voice {
            return Err(responder
                .create_message(
                    Message::plain("Activities can only be started in Voice Channels.")
                        .ephemeral(true),
                )
                .into_err("Activity requested for a non-voice channel"));
        }

        let invite = ActivityInvite::new(activity.application_id());
        let code = match ctx.invites.0.create_activity_invite(channel.id, &invite).await {
            Ok(c) => c,
            Err(err) => {
                error!(
                    ?err,
                    channel = %channel.id,
                    activity = activity.key,
                    "Failed to create activity invite"
                );
                return Err(responder
                    .create_message(Message::plain("Failed to start Activity.").ephemeral(true))
                    .into_err("Error creating activity invite"));
            },
        };

        let channel_name = channel.name.as_deref().unwrap_or("your channel");

        Ok(responder
            .create_message(Message::rich(|b| {
                b.push(format!(
                    "[Click here to start {} in {channel_name}.](<https://discord.gg/{code}>)",
                    activity.name
                ))
            }))
            .into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use paracord::interaction::{fixture, handler::CommandHandler as _};
    use serde_json::{json, Value};
    use serenity::builder::CreateCommand;

    use super::ActivityCommand;
    use crate::client::{commands::test_util::respond, rest::fake::RecordingRest};

    fn options(channel: &str, activity: &str) -> Value {
        json!([
            { "name": "channel", "type": 7, "value": channel },
            { "name": "activity", "type": 3, "value": activity },
        ])
    }

    fn guild_activity(kind: u8, activity: &str) -> Value {
        let id = fixture::VOICE_CHANNEL_ID;
        fixture::guild_command(
            "activity",
            options(id, activity),
            fixture::resolved_channel(id, "Lounge", kind),
        )
    }

    #[test]
    fn registration() {
        let json = serde_json::to_value(CreateCommand::from(ActivityCommand.register_global()))
            .unwrap();

        assert_eq!(json["name"], "activity");
        assert_eq!(json["description"], "Start an Activity in a Voice Channel.");

        let opts = json["options"].as_array().unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0]["name"], "channel");
        assert_eq!(opts[0]["type"], 7);
        assert_eq!(opts[0]["required"], true);
        assert_eq!(opts[1]["name"], "activity");
        assert_eq!(opts[1]["type"], 3);
        assert_eq!(opts[1]["required"], true);
        assert_eq!(
            opts[1]["choices"],
            json!([
                { "name": "Poker Night", "value": "poker" },
                { "name": "Betrayal.io", "value": "betrayal" },
                { "name": "YouTube Together", "value": "youtube" },
                { "name": "Fishington.io", "value": "fishing" },
            ])
        );
    }

    #[tokio::test]
    async fn starts_activity_in_voice_channel() {
        let rest = Arc::new(RecordingRest::default());
        let res = respond(Arc::clone(&rest), &guild_activity(2, "youtube"))
            .await
            .unwrap();

        let calls = rest.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to_string(), fixture::VOICE_CHANNEL_ID);
        assert_eq!(
            calls[0].1,
            json!({
                "max_age": 604_800,
                "max_uses": 0,
                "temporary": false,
                "target_type": 2,
                "target_application_id": "755600276941176913",
            })
        );

        assert_eq!(res["type"], 4);
        assert_ne!(res["data"]["flags"], 64);
        assert_eq!(
            res["data"]["content"],
            format!(
                "[Click here to start YouTube Together in Lounge.](<https://discord.gg/{}>)",
                RecordingRest::CODE
            )
        );
    }

    #[tokio::test]
    async fn rejects_non_voice_channels() {
        let rest = Arc::new(RecordingRest::default());
        let res = respond(Arc::clone(&rest), &guild_activity(0, "poker"))
            .await
            .unwrap();

        assert_eq!(
            res["data"]["content"],
            "Activities can only be started in Voice Channels."
        );
        assert_eq!(res["data"]["flags"], 64);
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_activity() {
        let rest = Arc::new(RecordingRest::default());
        let res = respond(Arc::clone(&rest), &guild_activity(2, "chess"))
            .await
            .unwrap();

        assert_eq!(res["data"]["content"], "Invalid interaction.");
        assert_eq!(res["data"]["flags"], 64);
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn rejects_missing_channel() {
        let rest = Arc::new(RecordingRest::default());
        let payload = fixture::guild_command(
            "activity",
            json!([{ "name": "activity", "type": 3, "value": "fishing" }]),
            json!({}),
        );
        let res = respond(Arc::clone(&rest), &payload).await.unwrap();

        assert_eq!(res["data"]["content"], "Invalid interaction.");
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn ignores_direct_messages() {
        let rest = Arc::new(RecordingRest::default());
        let id = fixture::VOICE_CHANNEL_ID;
        let payload = fixture::dm_command(
            "activity",
            options(id, "youtube"),
            fixture::resolved_channel(id, "Lounge", 2),
        );

        assert!(respond(Arc::clone(&rest), &payload).await.is_none());
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn direct_messages_skip_option_parsing() {
        let options = json!([{ "name": "channel", "type": 1, "options": [] }]);

        let res = respond(
            Arc::default(),
            &fixture::guild_command("activity", options.clone(), json!({})),
        )
        .await
        .unwrap();
        assert!(res["data"]["content"]
            .as_str()
            .unwrap()
            .starts_with("Unexpected error parsing command: "));

        let payload = fixture::dm_command("activity", options, json!({}));
        assert!(respond(Arc::default(), &payload).await.is_none());
    }

    #[tokio::test]
    async fn reports_invite_failure() {
        let rest = Arc::new(RecordingRest::failing());
        let res = respond(Arc::clone(&rest), &guild_activity(2, "betrayal"))
            .await
            .unwrap();

        assert_eq!(rest.calls().len(), 1);
        assert_eq!(res["data"]["content"], "Failed to start Activity.");
        assert_eq!(res["data"]["flags"], 64);
    }
}
