//! Join-to-create voice channels.
//!
//! Joining a configured template channel spawns a new voice channel next to it, named from
//! the template's output pattern, owned by the joiner, who is moved into it. Managed
//! channels are deleted once empty, and ownership moves to a remaining member when the
//! owner leaves.
//!
//! The manager tracks which channels it created (`channel -> template name`) in memory. All
//! voice updates go through one lock so that naming and creation for concurrent joins are
//! serialised and never produce the same name.

pub mod naming;
pub mod ownership;

#[cfg(test)]
mod test;

use serenity::all::{ChannelId, GuildId, UserId};
use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};

use crate::server::{
    discord::GuildApi,
    error::AppError,
    model::{
        discord::NewVoiceChannel,
        voice::{ChannelTemplate, VoiceTransition},
    },
    service::monitor::{MonitorHandle, Subscription},
};

use self::{
    naming::next_channel_name,
    ownership::{plan_leave, plan_orphan, LeaveAction},
};

/// Managed channels of one guild, mapped to the template they were spawned from.
type ManagedChannels = HashMap<ChannelId, String>;

/// Counts from a cleanup pass over a guild's managed channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Records dropped because their channel no longer exists.
    pub forgotten: usize,
    pub deleted: usize,
    pub promoted: usize,
}

#[derive(Default)]
pub struct JoinToCreateManager {
    templates: RwLock<HashMap<String, ChannelTemplate>>,
    guilds: Mutex<HashMap<GuildId, ManagedChannels>>,
    registrations: Mutex<HashMap<GuildId, Subscription>>,
}

impl JoinToCreateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the template configuration, keyed by template channel name.
    pub async fn configure(&self, templates: HashMap<String, ChannelTemplate>) {
        tracing::debug!("Configured {} join-to-create templates", templates.len());
        *self.templates.write().await = templates;
    }

    pub async fn has_templates(&self) -> bool {
        !self.templates.read().await.is_empty()
    }

    /// Starts handling voice state updates for a guild.
    ///
    /// Monitoring a guild again replaces the previous subscription.
    pub async fn monitor(&self, guild_id: GuildId) -> MonitorHandle {
        let subscription = Subscription::new();

        if let Some(previous) = self
            .registrations
            .lock()
            .await
            .insert(guild_id, subscription.clone())
        {
            previous.cancel();
        }

        tracing::info!("Monitoring join-to-create channels in guild {}", guild_id);

        MonitorHandle::new(guild_id, subscription, None)
    }

    async fn is_monitored(&self, guild_id: GuildId) -> bool {
        let mut registrations = self.registrations.lock().await;
        match registrations.get(&guild_id) {
            Some(subscription) if subscription.is_active() => true,
            Some(_) => {
                registrations.remove(&guild_id);
                false
            }
            None => false,
        }
    }

    /// Handles a member joining, leaving or switching voice channels.
    ///
    /// The left channel is processed before the joined one, so moving from a managed
    /// channel into a template channel both cleans up and spawns.
    pub async fn handle_voice_update(&self, api: &dyn GuildApi, transition: VoiceTransition) {
        let guild_id = transition.guild_id;
        if !self.is_monitored(guild_id).await {
            return;
        }

        let mut guilds = self.guilds.lock().await;
        let managed = guilds.entry(guild_id).or_default();

        if let Some(left) = transition.left() {
            if managed.contains_key(&left) {
                self.handle_leave(api, guild_id, managed, left, transition.user_id)
                    .await;
            }
        }

        if let Some(joined) = transition.joined() {
            self.handle_join(api, &transition, managed, joined).await;
        }
    }

    async fn handle_join(
        &self,
        api: &dyn GuildApi,
        transition: &VoiceTransition,
        managed: &mut ManagedChannels,
        joined: ChannelId,
    ) {
        let guild_id = transition.guild_id;
        let user_id = transition.user_id;

        let channel = match api.channel(guild_id, joined).await {
            Ok(Some(channel)) => channel,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(
                    "Failed to resolve voice channel {} in guild {}: {}",
                    joined,
                    guild_id,
                    e
                );
                return;
            }
        };

        let Some(template) = self.templates.read().await.get(&channel.name).cloned() else {
            return;
        };

        let similar = managed
            .values()
            .filter(|source| **source == channel.name)
            .count();

        let existing: HashSet<String> = match api.channels(guild_id).await {
            Ok(channels) => channels.into_iter().map(|channel| channel.name).collect(),
            Err(e) => {
                tracing::error!("Failed to list channels of guild {}: {}", guild_id, e);
                return;
            }
        };

        let name = next_channel_name(&template.name, &transition.username, similar, &existing);

        let created = match api
            .create_voice_channel(
                guild_id,
                NewVoiceChannel {
                    name: name.clone(),
                    parent_id: channel.parent_id,
                    user_limit: template.user_limit(),
                    owner: user_id,
                },
            )
            .await
        {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(
                    "Failed to create channel '{}' for user {} in guild {}: {}",
                    name,
                    user_id,
                    guild_id,
                    e
                );
                return;
            }
        };

        managed.insert(created, channel.name.clone());
        tracing::info!(
            "Created channel '{}' ({}) from '{}' for user {} in guild {}",
            name,
            created,
            channel.name,
            user_id,
            guild_id
        );

        if let Err(e) = api.move_member(guild_id, user_id, created).await {
            tracing::error!(
                "Failed to move user {} into channel {} in guild {}: {}",
                user_id,
                created,
                guild_id,
                e
            );
            // Nobody will ever leave the channel, so nothing else would delete it
            self.delete_managed(api, guild_id, managed, created).await;
        }
    }

    async fn handle_leave(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        managed: &mut ManagedChannels,
        left: ChannelId,
        user_id: UserId,
    ) {
        let remaining = match api.voice_members(guild_id, left).await {
            Ok(members) => members,
            Err(e) => {
                tracing::error!(
                    "Failed to list members of channel {} in guild {}: {}",
                    left,
                    guild_id,
                    e
                );
                return;
            }
        };
        let owners = match api.channel_owners(guild_id, left).await {
            Ok(owners) => owners,
            Err(e) => {
                tracing::error!(
                    "Failed to list owners of channel {} in guild {}: {}",
                    left,
                    guild_id,
                    e
                );
                return;
            }
        };

        let action = plan_leave(user_id, &remaining, &owners);
        self.apply(api, guild_id, managed, left, action).await;
    }

    /// Applies a planned action, returning whether it fully succeeded.
    async fn apply(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        managed: &mut ManagedChannels,
        channel_id: ChannelId,
        action: LeaveAction,
    ) -> bool {
        match action {
            LeaveAction::Delete => self.delete_managed(api, guild_id, managed, channel_id).await,
            LeaveAction::RevokeOwner { user } => {
                log_failure(api.revoke_owner(channel_id, user).await, "revoke owner", channel_id)
            }
            LeaveAction::TransferOwner { from, to } => {
                tracing::info!(
                    "Transferring channel {} in guild {} from user {} to user {}",
                    channel_id,
                    guild_id,
                    from,
                    to
                );
                log_failure(api.grant_owner(channel_id, to).await, "grant owner", channel_id)
                    && log_failure(
                        api.revoke_owner(channel_id, from).await,
                        "revoke owner",
                        channel_id,
                    )
            }
            LeaveAction::PromoteMember { to } => {
                tracing::info!(
                    "Promoting user {} to owner of channel {} in guild {}",
                    to,
                    channel_id,
                    guild_id
                );
                log_failure(api.grant_owner(channel_id, to).await, "grant owner", channel_id)
            }
            LeaveAction::Keep => true,
        }
    }

    async fn delete_managed(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        managed: &mut ManagedChannels,
        channel_id: ChannelId,
    ) -> bool {
        match api.delete_channel(channel_id).await {
            Ok(()) => {
                managed.remove(&channel_id);
                tracing::info!("Deleted empty channel {} in guild {}", channel_id, guild_id);
                true
            }
            Err(e) => {
                tracing::error!(
                    "Failed to delete channel {} in guild {}: {}",
                    channel_id,
                    guild_id,
                    e
                );
                false
            }
        }
    }

    /// Repairs managed channels of a guild after missed events.
    ///
    /// Drops records of channels that no longer exist, deletes empty managed channels and
    /// promotes a member in channels whose owners are all gone.
    ///
    /// # Returns
    /// - `Ok(CleanupReport)` - Pass completed; individual failures are logged
    /// - `Err(AppError)` - Guild channels could not be listed
    pub async fn cleanup_orphans(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
    ) -> Result<CleanupReport, AppError> {
        let mut guilds = self.guilds.lock().await;
        let managed = guilds.entry(guild_id).or_default();
        let mut report = CleanupReport::default();

        let existing: HashSet<ChannelId> = api
            .channels(guild_id)
            .await?
            .into_iter()
            .map(|channel| channel.id)
            .collect();

        let before = managed.len();
        managed.retain(|channel_id, _| existing.contains(channel_id));
        report.forgotten = before - managed.len();

        let channel_ids: Vec<ChannelId> = managed.keys().copied().collect();
        for channel_id in channel_ids {
            let members = match api.voice_members(guild_id, channel_id).await {
                Ok(members) => members,
                Err(e) => {
                    tracing::error!(
                        "Failed to list members of channel {} in guild {}: {}",
                        channel_id,
                        guild_id,
                        e
                    );
                    continue;
                }
            };
            let owners = match api.channel_owners(guild_id, channel_id).await {
                Ok(owners) => owners,
                Err(e) => {
                    tracing::error!(
                        "Failed to list owners of channel {} in guild {}: {}",
                        channel_id,
                        guild_id,
                        e
                    );
                    continue;
                }
            };

            let action = plan_orphan(&members, &owners);
            let applied = self
                .apply(api, guild_id, managed, channel_id, action)
                .await;

            match action {
                LeaveAction::Delete if applied => report.deleted += 1,
                LeaveAction::PromoteMember { .. } if applied => report.promoted += 1,
                _ => {}
            }
        }

        Ok(report)
    }

    /// Drops the record of a managed channel deleted outside the manager.
    ///
    /// # Returns
    /// - `true` - The channel was managed
    pub async fn forget_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        self.guilds
            .lock()
            .await
            .get_mut(&guild_id)
            .is_some_and(|managed| managed.remove(&channel_id).is_some())
    }

    /// Managed channels of a guild with their template names.
    pub async fn managed_channels(&self, guild_id: GuildId) -> Vec<(ChannelId, String)> {
        let mut channels: Vec<(ChannelId, String)> = self
            .guilds
            .lock()
            .await
            .get(&guild_id)
            .map(|managed| {
                managed
                    .iter()
                    .map(|(channel_id, source)| (*channel_id, source.clone()))
                    .collect()
            })
            .unwrap_or_default();
        channels.sort();
        channels
    }
}

fn log_failure(result: Result<(), AppError>, action: &str, channel_id: ChannelId) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to {} on channel {}: {}", action, channel_id, e);
            false
        }
    }
}
