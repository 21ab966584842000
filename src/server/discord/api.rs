use serenity::all::{ChannelId, GuildId, Role, RoleId, UserId};
use serenity::async_trait;

use crate::server::{
    error::AppError,
    model::discord::{ChannelInfo, NewVoiceChannel},
};

/// Discord operations needed by the role decay and join-to-create services.
///
/// Implementations report Discord failures (missing permissions, unknown objects, network
/// errors) as `AppError::DiscordErr`; callers decide whether to log or propagate them.
#[async_trait]
pub trait GuildApi: Send + Sync {
    /// Lists the guild's roles as currently defined on Discord.
    async fn roles(&self, guild_id: GuildId) -> Result<Vec<Role>, AppError>;

    /// Lists members of the guild currently holding `role_id`.
    async fn role_holders(&self, guild_id: GuildId, role_id: RoleId)
        -> Result<Vec<UserId>, AppError>;

    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), AppError>;

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), AppError>;

    /// Resolves a guild channel along with its parent category name.
    ///
    /// # Returns
    /// - `Ok(Some(ChannelInfo))` - Channel exists in the guild
    /// - `Ok(None)` - Channel is unknown, deleted, or a thread
    async fn channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<ChannelInfo>, AppError>;

    /// Lists every channel of the guild, categories included.
    async fn channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>, AppError>;

    /// Creates a voice channel with owner permissions granted to `channel.owner`.
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        channel: NewVoiceChannel,
    ) -> Result<ChannelId, AppError>;

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), AppError>;

    /// Moves a member who is connected to voice into `channel_id`.
    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), AppError>;

    /// Lists members currently connected to a voice channel.
    async fn voice_members(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Vec<UserId>, AppError>;

    /// Lists members holding owner permission overwrites on a channel.
    async fn channel_owners(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Vec<UserId>, AppError>;

    async fn grant_owner(&self, channel_id: ChannelId, user_id: UserId) -> Result<(), AppError>;

    async fn revoke_owner(&self, channel_id: ChannelId, user_id: UserId)
        -> Result<(), AppError>;
}
