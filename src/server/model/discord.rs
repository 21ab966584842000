//! Snapshots of Discord channel state used by the automation services.

use serenity::all::{ChannelId, ChannelType, GuildChannel, Permissions, UserId};

/// Permissions granted to the owner of a join-to-create voice channel.
pub fn owner_permissions() -> Permissions {
    Permissions::PRIORITY_SPEAKER | Permissions::MOVE_MEMBERS | Permissions::MANAGE_CHANNELS
}

/// Guild channel with its parent category resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelType,
    pub parent_id: Option<ChannelId>,
    /// Name of the parent category, when it could be resolved.
    pub parent_name: Option<String>,
}

impl ChannelInfo {
    /// Converts a Serenity guild channel, leaving the parent name unresolved.
    ///
    /// # Arguments
    /// - `channel` - Serenity guild channel from the cache or REST API
    ///
    /// # Returns
    /// - `ChannelInfo` - Snapshot with `parent_name` set to `None`
    pub fn from_guild_channel(channel: &GuildChannel) -> Self {
        Self {
            id: channel.id,
            name: channel.name.clone(),
            kind: channel.kind,
            parent_id: channel.parent_id,
            parent_name: None,
        }
    }

    pub fn with_parent_name(mut self, parent_name: Option<String>) -> Self {
        self.parent_name = parent_name;
        self
    }
}

/// Parameters for creating a join-to-create voice channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVoiceChannel {
    pub name: String,
    /// Category to create the channel under.
    pub parent_id: Option<ChannelId>,
    /// Maximum members, `None` for unlimited.
    pub user_limit: Option<u32>,
    /// Member granted [`owner_permissions`] on the new channel.
    pub owner: UserId,
}
