use serenity::all::GuildId;

use crate::{
    model::settings::RoleDecaySeedDto,
    server::{error::AppError, service::upstream::UpstreamClient},
};

/// Client for the Discord settings service (`HOST_DISCORD`).
pub struct SettingsClient {
    client: UpstreamClient,
}

impl SettingsClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Fetches persisted role decay state used to seed a guild after startup.
    pub async fn role_decay_seed(&self, guild_id: GuildId) -> Result<RoleDecaySeedDto, AppError> {
        self.client
            .get(&["role-decay", &guild_id.to_string()])
            .await
    }
}
