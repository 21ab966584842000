//! Settings and event payloads for the role decay feature.

use chrono::{DateTime, TimeDelta, Utc};
use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use std::time::Duration;

use crate::server::model::discord::ChannelInfo;

/// Role decay behavior for a deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDecaySettings {
    /// Name of the role granted on activity, matched case-insensitively.
    pub role_name: String,
    /// Inactivity period after which the role is removed.
    pub decay: TimeDelta,
    /// Period between sweeps.
    pub interval: Duration,
}

/// Channels whose messages count as activity.
///
/// Entries match either a channel/category id or, case-insensitively, its name. An empty
/// scope watches every channel of the guild.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelScope {
    pub categories: Vec<String>,
    pub channels: Vec<String>,
}

impl ChannelScope {
    pub fn new(categories: Vec<String>, channels: Vec<String>) -> Self {
        Self {
            categories,
            channels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.channels.is_empty()
    }

    /// Checks whether a message posted in `channel` qualifies as activity.
    ///
    /// # Returns
    /// - `true` - Scope is empty, or the channel or its parent category is listed
    /// - `false` - Neither the channel nor its category is listed
    pub fn contains(&self, channel: &ChannelInfo) -> bool {
        if self.is_empty() {
            return true;
        }

        if matches_entry(&self.channels, channel.id, Some(&channel.name)) {
            return true;
        }

        match channel.parent_id {
            Some(parent_id) => matches_entry(
                &self.categories,
                parent_id,
                channel.parent_name.as_deref(),
            ),
            None => false,
        }
    }
}

fn matches_entry(entries: &[String], id: ChannelId, name: Option<&str>) -> bool {
    let id = id.get().to_string();
    entries.iter().any(|entry| {
        *entry == id || name.is_some_and(|name| name.eq_ignore_ascii_case(entry))
    })
}

/// A guild message reduced to what role decay needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageActivity {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub author_is_bot: bool,
    /// Author's roles when the gateway included member data with the message.
    pub author_roles: Option<Vec<RoleId>>,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a role decay command, reported back to the invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCommandOutcome {
    /// State changed as requested.
    Applied,
    /// Request matched the existing state; nothing changed.
    Unchanged,
    /// The configured role does not exist in the guild.
    RoleMissing,
}
