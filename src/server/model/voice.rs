//! Join-to-create configuration and voice state transitions.

use serde::Deserialize;
use serenity::all::{ChannelId, GuildId, UserId};

/// Output settings for channels spawned from a template channel.
///
/// Deserialized from the `JOIN_TO_CREATE` configuration, keyed by template channel name:
///
/// ```json
/// { "Create Party": { "name": "Party-{$counter}", "amount": 4 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelTemplate {
    /// Name template supporting `{$username}` and `{$counter}` placeholders.
    pub name: String,
    /// User limit of spawned channels, absent or zero for unlimited.
    #[serde(default)]
    pub amount: Option<u32>,
}

impl ChannelTemplate {
    pub fn user_limit(&self) -> Option<u32> {
        self.amount.filter(|limit| *limit > 0)
    }
}

/// A member moving between voice channels of a guild.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTransition {
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// Display name used for the `{$username}` placeholder.
    pub username: String,
    pub old_channel: Option<ChannelId>,
    pub new_channel: Option<ChannelId>,
}

impl VoiceTransition {
    /// Channel the member left, ignoring updates that stay in the same channel.
    pub fn left(&self) -> Option<ChannelId> {
        self.old_channel.filter(|old| Some(*old) != self.new_channel)
    }

    /// Channel the member joined, ignoring updates that stay in the same channel.
    pub fn joined(&self) -> Option<ChannelId> {
        self.new_channel.filter(|new| Some(*new) != self.old_channel)
    }
}
