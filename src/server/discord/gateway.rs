//! [`GuildApi`] implementation backed by a Serenity gateway context.
//!
//! Reads prefer the gateway cache and fall back to the REST API when the guild is not
//! cached. Voice membership is only available from the cache, which Serenity updates
//! before dispatching `voice_state_update` to event handlers.

use serenity::all::{
    ChannelId, ChannelType, Context, CreateChannel, GuildChannel, GuildId, PermissionOverwrite,
    PermissionOverwriteType, Permissions, Role, RoleId, UserId,
};
use serenity::async_trait;
use std::collections::HashMap;

use crate::server::{
    discord::api::GuildApi,
    error::AppError,
    model::discord::{owner_permissions, ChannelInfo, NewVoiceChannel},
};

/// Page size used when listing guild members, the maximum Discord allows.
const MEMBER_PAGE_SIZE: u64 = 1000;

const AUDIT_LOG_REASON: &str = "Role decay";

#[derive(Clone)]
pub struct SerenityGuildApi {
    ctx: Context,
}

impl SerenityGuildApi {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Snapshot of the guild's channels from the cache, if the guild is cached.
    fn cached_channels(&self, guild_id: GuildId) -> Option<HashMap<ChannelId, GuildChannel>> {
        self.ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.clone())
    }

    async fn guild_channels(
        &self,
        guild_id: GuildId,
    ) -> Result<HashMap<ChannelId, GuildChannel>, AppError> {
        match self.cached_channels(guild_id) {
            Some(channels) => Ok(channels),
            None => Ok(guild_id.channels(&self.ctx).await?),
        }
    }
}

fn to_channel_info(
    channel: &GuildChannel,
    channels: &HashMap<ChannelId, GuildChannel>,
) -> ChannelInfo {
    let parent_name = channel
        .parent_id
        .and_then(|parent_id| channels.get(&parent_id))
        .map(|parent| parent.name.clone());

    ChannelInfo::from_guild_channel(channel).with_parent_name(parent_name)
}

fn owners_of(channel: &GuildChannel) -> Vec<UserId> {
    channel
        .permission_overwrites
        .iter()
        .filter_map(|overwrite| match overwrite.kind {
            PermissionOverwriteType::Member(user_id)
                if overwrite.allow.contains(Permissions::MANAGE_CHANNELS) =>
            {
                Some(user_id)
            }
            _ => None,
        })
        .collect()
}

fn owner_overwrite(user_id: UserId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: owner_permissions(),
        deny: Permissions::empty(),
        kind: PermissionOverwriteType::Member(user_id),
    }
}

#[async_trait]
impl GuildApi for SerenityGuildApi {
    async fn roles(&self, guild_id: GuildId) -> Result<Vec<Role>, AppError> {
        let roles = guild_id.roles(&self.ctx).await?;
        Ok(roles.into_values().collect())
    }

    async fn role_holders(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<Vec<UserId>, AppError> {
        let mut holders = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = guild_id
                .members(&self.ctx, Some(MEMBER_PAGE_SIZE), after)
                .await?;
            let page_len = page.len() as u64;
            after = page.last().map(|member| member.user.id);

            holders.extend(
                page.into_iter()
                    .filter(|member| member.roles.contains(&role_id))
                    .map(|member| member.user.id),
            );

            if page_len < MEMBER_PAGE_SIZE || after.is_none() {
                break;
            }
        }

        Ok(holders)
    }

    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), AppError> {
        self.ctx
            .http
            .add_member_role(guild_id, user_id, role_id, Some(AUDIT_LOG_REASON))
            .await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), AppError> {
        self.ctx
            .http
            .remove_member_role(guild_id, user_id, role_id, Some(AUDIT_LOG_REASON))
            .await?;
        Ok(())
    }

    async fn channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<ChannelInfo>, AppError> {
        let channels = self.guild_channels(guild_id).await?;
        Ok(channels
            .get(&channel_id)
            .map(|channel| to_channel_info(channel, &channels)))
    }

    async fn channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>, AppError> {
        let channels = self.guild_channels(guild_id).await?;
        Ok(channels
            .values()
            .map(|channel| to_channel_info(channel, &channels))
            .collect())
    }

    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        channel: NewVoiceChannel,
    ) -> Result<ChannelId, AppError> {
        let mut builder = CreateChannel::new(channel.name)
            .kind(ChannelType::Voice)
            .permissions(vec![owner_overwrite(channel.owner)]);

        if let Some(parent_id) = channel.parent_id {
            builder = builder.category(parent_id);
        }
        if let Some(user_limit) = channel.user_limit {
            builder = builder.user_limit(user_limit);
        }

        let created = guild_id.create_channel(&self.ctx, builder).await?;
        Ok(created.id)
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), AppError> {
        channel_id.delete(&self.ctx).await?;
        Ok(())
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), AppError> {
        guild_id.move_member(&self.ctx, user_id, channel_id).await?;
        Ok(())
    }

    async fn voice_members(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Vec<UserId>, AppError> {
        let members = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| {
                guild
                    .voice_states
                    .values()
                    .filter(|state| state.channel_id == Some(channel_id))
                    .map(|state| state.user_id)
                    .collect()
            })
            .unwrap_or_default();

        Ok(members)
    }

    async fn channel_owners(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Vec<UserId>, AppError> {
        let channels = self.guild_channels(guild_id).await?;
        Ok(channels.get(&channel_id).map(owners_of).unwrap_or_default())
    }

    async fn grant_owner(&self, channel_id: ChannelId, user_id: UserId) -> Result<(), AppError> {
        channel_id
            .create_permission(&self.ctx, owner_overwrite(user_id))
            .await?;
        Ok(())
    }

    async fn revoke_owner(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        channel_id
            .delete_permission(&self.ctx, PermissionOverwriteType::Member(user_id))
            .await?;
        Ok(())
    }
}
