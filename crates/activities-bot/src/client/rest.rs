use serenity::{
    http::Http,
    model::{
        id::{ApplicationId, ChannelId},
        invite::InviteTargetType,
    },
};

use crate::prelude::*;

/// Invites last for one week
const MAX_AGE_SECS: u32 = 7 * 24 * 60 * 60;

/// Request body for an invite that launches an embedded application
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivityInvite {
    max_age: u32,
    max_uses: u32,
    temporary: bool,
    target_type: InviteTargetType,
    target_application_id: ApplicationId,
}

impl ActivityInvite {
    pub fn new(target_application_id: ApplicationId) -> Self {
        Self {
            max_age: MAX_AGE_SECS,
            max_uses: 0,
            temporary: false,
            target_type: InviteTargetType::EmbeddedApplication,
            target_application_id,
        }
    }
}

/// The subset of the Discord REST API used to start activities
#[async_trait]
pub trait InviteRest: Send + Sync {
    /// Create an activity invite on the given channel, returning its code
    async fn create_activity_invite(
        &self,
        channel: ChannelId,
        invite: &ActivityInvite,
    ) -> Result<String, serenity::Error>;
}

#[async_trait]
impl InviteRest for Http {
    async fn create_activity_invite(
        &self,
        channel: ChannelId,
        invite: &ActivityInvite,
    ) -> Result<String, serenity::Error> {
        self.create_invite(channel, invite, None)
            .await
            .map(|i| i.code)
    }
}
